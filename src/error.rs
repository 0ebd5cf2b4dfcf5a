use thiserror::Error;




/**
 * Error to represent a fatal condition raised while advancing the system: a
 * non-realizable state after a hyperbolic stage, a failed implicit solve, or
 * an invalid configuration. Recoverable conditions (bad interface states,
 * stiff diffusive fluxes) are handled locally and never surface here.
 */
#[derive(Error, Debug)]
pub enum Error {

    #[error("non-realizable state after {stage} at zone {index:?}")]
    NonRealizableState {
        stage: &'static str,
        index: (i64, i64, i64),
    },

    #[error("radiation-matter coupling did not converge at zone {index:?} after {iterations} iterations \
             (rho = {rho:e}, T = {tgas:e}, Egas = {egas:e}, Erad = {erad:e})")]
    CouplingNotConverged {
        index: (i64, i64, i64),
        iterations: usize,
        rho: f64,
        tgas: f64,
        egas: f64,
        erad: f64,
    },

    #[error("non-positive energy at zone {index:?} (Egas = {egas:e}, Erad = {erad:e})")]
    NonPositiveEnergy {
        index: (i64, i64, i64),
        egas: f64,
        erad: f64,
    },

    #[error("SDC iteration did not converge: residual {residual:e} after {iterations} iterations")]
    SdcNotConverged {
        residual: f64,
        iterations: usize,
    },

    #[error("non-positive radiation energy density {erad:e} at zone {index:?}")]
    NonPositiveRadiationEnergy {
        index: (i64, i64, i64),
        erad: f64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Hydro(#[from] crate::hydro::Error),
}
