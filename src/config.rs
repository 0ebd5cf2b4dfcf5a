use serde::{Serialize, Deserialize};
use crate::error::Error;
use crate::reconstruct::Reconstruction;




pub const C_LIGHT_CGS: f64 = 2.99792458e10;
pub const RADIATION_CONSTANT_CGS: f64 = 7.5646e-15;
pub const HYDROGEN_MASS_CGS: f64 = 1.6726231e-24;
pub const BOLTZMANN_CONSTANT_CGS: f64 = 1.380658e-16;




/**
 * Strategy used to advance the hyperbolic subsystem over one timestep
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeIntegrator {
    /// Two-stage strong-stability-preserving Runge-Kutta
    Rk2,
    /// Fixed-point spectral deferred correction, with the source terms
    /// applied inside each iteration
    Sdc2,
}




/**
 * Parameters of the hyperbolic time integrator
 */
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegratorConfig {

    /// Courant number: (0.0, 1.0]
    pub cfl_number: f64,

    /// Interface reconstruction: [Constant | Linear | Parabolic]
    pub reconstruction: Reconstruction,

    /// Time integration: [Rk2 | Sdc2]
    pub time_integrator: TimeIntegrator,

    /// Absolute residual below which the SDC iteration stops
    pub sdc_tolerance: f64,

    /// Upper bound on SDC iterations per step
    pub sdc_max_iterations: usize,

    /// Largest allowed ratio of successive timesteps
    pub dt_expand_factor: f64,

    /// Width of the guard zone layer around each patch
    pub num_guard: i64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            cfl_number: 0.3,
            reconstruction: Reconstruction::Parabolic,
            time_integrator: TimeIntegrator::Rk2,
            sdc_tolerance: 1e-10,
            sdc_max_iterations: 200,
            dt_expand_factor: 1.2,
            num_guard: 4,
        }
    }
}

impl IntegratorConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.cfl_number > 0.0 && self.cfl_number <= 1.0) {
            return Err(Error::InvalidConfig(format!("cfl_number must be in (0, 1], got {}", self.cfl_number)))
        }
        if self.time_integrator == TimeIntegrator::Sdc2 && self.reconstruction == Reconstruction::Parabolic {
            return Err(Error::InvalidConfig("SDC2 is unstable with parabolic reconstruction; use Linear".into()))
        }
        if self.num_guard < self.reconstruction.required_guard() {
            return Err(Error::InvalidConfig(format!(
                "{:?} reconstruction needs {} guard zones, got {}",
                self.reconstruction,
                self.reconstruction.required_guard(),
                self.num_guard)))
        }
        if !(self.dt_expand_factor > 0.0) {
            return Err(Error::InvalidConfig("dt_expand_factor must be positive".into()))
        }
        if !(self.sdc_tolerance > 0.0) || self.sdc_max_iterations == 0 {
            return Err(Error::InvalidConfig("SDC tolerance and iteration cap must be positive".into()))
        }
        Ok(())
    }
}




/**
 * Stopping criteria for the implicit radiation-matter coupling solve
 */
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewtonConfig {

    /// Residual tolerance, relative to the total energy of the zone
    pub tolerance: f64,

    /// Iteration cap; exceeding it is a fatal error
    pub max_iterations: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self { tolerance: 1e-10, max_iterations: 200 }
    }
}

impl NewtonConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.tolerance > 0.0) || self.max_iterations == 0 {
            return Err(Error::InvalidConfig("Newton tolerance and iteration cap must be positive".into()))
        }
        Ok(())
    }
}




/**
 * Physical constants of the radiation subsystem. The defaults are cgs values
 * with the reduced light speed equal to the physical one.
 */
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RadiationConstants {
    pub c_light: f64,
    pub c_hat: f64,
    pub radiation_constant: f64,
    pub mean_molecular_mass: f64,
    pub boltzmann_constant: f64,
    pub gamma: f64,
    pub erad_floor: f64,
}

impl Default for RadiationConstants {
    fn default() -> Self {
        Self {
            c_light: C_LIGHT_CGS,
            c_hat: C_LIGHT_CGS,
            radiation_constant: RADIATION_CONSTANT_CGS,
            mean_molecular_mass: HYDROGEN_MASS_CGS,
            boltzmann_constant: BOLTZMANN_CONSTANT_CGS,
            gamma: 5.0 / 3.0,
            erad_floor: 0.0,
        }
    }
}

impl RadiationConstants {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.c_light > 0.0 && self.c_hat > 0.0 && self.c_hat <= self.c_light) {
            return Err(Error::InvalidConfig(format!(
                "need 0 < c_hat <= c_light, got c_hat = {:e}, c_light = {:e}", self.c_hat, self.c_light)))
        }
        if !(self.gamma > 1.0) {
            return Err(Error::InvalidConfig("gamma must exceed 1".into()))
        }
        if !(self.radiation_constant > 0.0 && self.mean_molecular_mass > 0.0 && self.boltzmann_constant > 0.0) {
            return Err(Error::InvalidConfig("radiation and gas constants must be positive".into()))
        }
        if self.erad_floor < 0.0 {
            return Err(Error::InvalidConfig("erad_floor must be non-negative".into()))
        }
        Ok(())
    }

    /**
     * Specific heat at constant volume of the ideal gas, per unit mass.
     */
    pub fn specific_heat(&self) -> f64 {
        self.boltzmann_constant / (self.mean_molecular_mass * (self.gamma - 1.0))
    }
}




/**
 * Floors applied to the gas after each hydrodynamic stage. The pressure floor
 * is derived from the temperature floor, and is skipped for an isothermal gas.
 */
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HydroFloors {
    pub density_floor: f64,
    pub temperature_floor: f64,
    pub mean_molecular_mass: f64,
    pub boltzmann_constant: f64,
    pub isothermal: bool,
}

impl Default for HydroFloors {
    fn default() -> Self {
        Self {
            density_floor: 0.0,
            temperature_floor: 0.0,
            mean_molecular_mass: HYDROGEN_MASS_CGS,
            boltzmann_constant: BOLTZMANN_CONSTANT_CGS,
            isothermal: false,
        }
    }
}

impl HydroFloors {
    pub fn validate(&self) -> Result<(), Error> {
        if self.density_floor < 0.0 || self.temperature_floor < 0.0 {
            return Err(Error::InvalidConfig("floors must be non-negative".into()))
        }
        if !(self.mean_molecular_mass > 0.0) {
            return Err(Error::InvalidConfig("mean_molecular_mass must be positive".into()))
        }
        Ok(())
    }

    /**
     * Pressure floor for gas of the given density.
     */
    pub fn pressure_floor(&self, density: f64) -> f64 {
        (density / self.mean_molecular_mass) * self.boltzmann_constant * self.temperature_floor
    }
}
