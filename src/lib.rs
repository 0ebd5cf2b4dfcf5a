//! Radhydro is a library for radiation hydrodynamics on structured,
//! rectilinear grid patches. It advances the two-moment (M1 closure)
//! radiation transport equations together with the Euler equations of an
//! ideal gas, using a finite-volume hyperbolic integrator with PLM or PPM
//! reconstruction, HLL-type face solvers, and either SSP-RK2 or a
//! second-order spectral deferred correction (SDC) scheme in time. The
//! radiation is coupled to the gas energy and momentum by an implicit,
//! zone-local Newton-Raphson solve.

pub mod boundary;
pub mod config;
pub mod error;
pub mod hydro;
pub mod index_space;
pub mod integrator;
pub mod limiter;
pub mod mesh;
pub mod num_vec;
pub mod patch;
pub mod radiation;
pub mod reconstruct;
pub mod solvers;

pub use error::Error;
