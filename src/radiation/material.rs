use crate::boundary::SimulationMetadata;
use crate::config::RadiationConstants;




/**
 * The problem-specific physics consumed by the radiation subsystem: opacity,
 * the gas equation of state, and an optional radiation energy source. The
 * defaults describe an ideal gas with constant specific heat, a grey opacity
 * of 1, and no source. Gas energies here are internal energies per unit
 * volume, never the total energy.
 */
pub trait Material: Sync {

    fn constants(&self) -> &RadiationConstants;

    /**
     * Specific opacity (cross section per unit mass).
     */
    fn opacity(&self, _rho: f64, _tgas: f64) -> f64 {
        1.0
    }

    fn opacity_temp_derivative(&self, _rho: f64, _tgas: f64) -> f64 {
        0.0
    }

    fn tgas_from_egas(&self, rho: f64, egas: f64) -> f64 {
        egas / (rho * self.constants().specific_heat())
    }

    fn egas_from_tgas(&self, rho: f64, tgas: f64) -> f64 {
        rho * self.constants().specific_heat() * tgas
    }

    /**
     * Heat capacity per unit volume, `dEgas / dT`.
     */
    fn egas_temp_derivative(&self, rho: f64, _tgas: f64) -> f64 {
        rho * self.constants().specific_heat()
    }

    /**
     * Radiation energy emitted per unit volume and time by an external
     * source in the given zone; it is multiplied by the reduced light speed.
     */
    fn rad_energy_source(&self, _index: (i64, i64, i64), _metadata: &SimulationMetadata) -> f64 {
        0.0
    }
}




/**
 * Ideal gas with a constant (grey) specific opacity
 */
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GreyMaterial {
    pub constants: RadiationConstants,
    pub kappa: f64,
}

impl Material for GreyMaterial {
    fn constants(&self) -> &RadiationConstants {
        &self.constants
    }

    fn opacity(&self, _rho: f64, _tgas: f64) -> f64 {
        self.kappa
    }
}




/**
 * Material of the Su & Olson (1997) coupling problem. Its heat capacity
 * `alpha T^3`, with `alpha = 4a`, makes the emission linear in the gas
 * energy, and a closed zone relaxes to equilibrium exponentially.
 */
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SuOlson {
    pub constants: RadiationConstants,
}

impl SuOlson {
    pub fn alpha(&self) -> f64 {
        4.0 * self.constants.radiation_constant
    }

    /**
     * Gas temperature at time `t` of a closed, optically grey zone starting
     * from the gas energy `egas0` and radiation energy `erad0`.
     */
    pub fn exact_temperature(&self, rho: f64, egas0: f64, erad0: f64, t: f64) -> f64 {
        let a = self.constants.radiation_constant;
        let c = self.constants.c_light;
        let alpha = self.alpha();
        let e0 = (erad0 + egas0) / (a + alpha / 4.0);
        let t0_4 = self.tgas_from_egas(rho, egas0).powi(4);
        ((t0_4 - e0) * (-(4.0 / alpha) * (a + alpha / 4.0) * rho * c * t).exp() + e0).powf(0.25)
    }
}

impl Material for SuOlson {
    fn constants(&self) -> &RadiationConstants {
        &self.constants
    }

    fn tgas_from_egas(&self, _rho: f64, egas: f64) -> f64 {
        (4.0 * egas / self.alpha()).powf(0.25)
    }

    fn egas_from_tgas(&self, _rho: f64, tgas: f64) -> f64 {
        (self.alpha() / 4.0) * tgas.powi(4)
    }

    fn egas_temp_derivative(&self, _rho: f64, tgas: f64) -> f64 {
        self.alpha() * tgas.powi(3)
    }
}
