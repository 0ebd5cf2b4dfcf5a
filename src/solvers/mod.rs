//! Concrete hyperbolic systems for the integrator: the Euler equations and
//! the M1 radiation moment equations.

pub mod hydro;
pub mod radiation;

pub use hydro::HydroSystem;
pub use radiation::RadiationSystem;
