//! Ideal-gas hydrodynamics: conserved and primitive state types, the HLLE
//! Riemann solver, and the density and pressure floors.

pub mod error;
pub mod euler;

pub use error::Error;
