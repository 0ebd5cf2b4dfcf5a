//! Two-moment (M1 closure) radiation transport: the closure relation, the HLL
//! face solver with its asymptotic-preserving correction, and the implicit
//! coupling of radiation to the gas energy and momentum.
//!
//! The radiation subsystem shares one 9-component conserved state with the
//! gas. The indexes of the components are given below.

pub mod closure;
pub mod coupling;
pub mod material;
pub mod riemann;

pub use coupling::NewtonOutcome;
pub use material::{GreyMaterial, Material, SuOlson};

pub const GAS_DENSITY: usize = 0;
pub const X1_GAS_MOMENTUM: usize = 1;
pub const X2_GAS_MOMENTUM: usize = 2;
pub const X3_GAS_MOMENTUM: usize = 3;
pub const GAS_ENERGY: usize = 4;
pub const RAD_ENERGY: usize = 5;
pub const X1_RAD_FLUX: usize = 6;
pub const X2_RAD_FLUX: usize = 7;
pub const X3_RAD_FLUX: usize = 8;
pub const NUM_COMPONENTS: usize = 9;
