use thiserror::Error;




/**
 * Error to represent invalid hydrodynamics data or primitive variable recovery.
 */
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {

    #[error("negative gas pressure {pressure:e} at zone {index:?}")]
    NegativeGasPressure {
        index: (i64, i64, i64),
        pressure: f64,
    },

    #[error("negative mass density {density:e} at zone {index:?}")]
    NegativeMassDensity {
        index: (i64, i64, i64),
        density: f64,
    },
}
