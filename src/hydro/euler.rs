use std::ops::{Add, Sub, Mul, Div};
use crate::config::HydroFloors;
use crate::index_space::Axis;
use super::error::Error;




// ============================================================================
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conserved(pub f64, pub f64, pub f64, pub f64, pub f64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive(pub f64, pub f64, pub f64, pub f64, pub f64);




// ============================================================================
impl Conserved {

    pub fn from_slice(cons: &[f64]) -> Self {
        Self(cons[0], cons[1], cons[2], cons[3], cons[4])
    }

    pub fn write_to_slice(&self, cons: &mut [f64]) {
        cons[0] = self.0;
        cons[1] = self.1;
        cons[2] = self.2;
        cons[3] = self.3;
        cons[4] = self.4;
    }

    pub fn mass_density(&self) -> f64 {
        self.0
    }

    pub fn momentum(&self, axis: Axis) -> f64 {
        match axis {
            Axis::I => self.1,
            Axis::J => self.2,
            Axis::K => self.3,
        }
    }

    pub fn energy_density(&self) -> f64 {
        self.4
    }

    pub fn momentum_squared(&self) -> f64 {
        self.1 * self.1 + self.2 * self.2 + self.3 * self.3
    }

    /**
     * Internal energy per unit volume: total energy less the kinetic energy.
     */
    pub fn internal_energy_density(&self) -> f64 {
        self.energy_density() - 0.5 * self.momentum_squared() / self.mass_density()
    }

    pub fn to_primitive(&self, gamma_law_index: f64, index: (i64, i64, i64)) -> Result<Primitive, Error> {
        let d = self.mass_density();
        let pg = self.internal_energy_density() * (gamma_law_index - 1.0);

        if !(d > 0.0) {
            Err(Error::NegativeMassDensity { index, density: d })
        } else if !(pg >= 0.0) {
            Err(Error::NegativeGasPressure { index, pressure: pg })
        } else {
            Ok(Primitive(d, self.1 / d, self.2 / d, self.3 / d, pg))
        }
    }

    /**
     * Apply the density floor, and unless the gas is isothermal the pressure
     * floor. A floored density leaves the momentum untouched (the velocity
     * changes). A floored pressure resets the total energy so the internal
     * energy matches the floor. The kinetic energy is evaluated from the
     * unchanged momentum and the floored density.
     */
    pub fn with_floors(&self, floors: &HydroFloors, gamma_law_index: f64) -> Self {
        let rho = self.mass_density();
        let rho_new = if rho < floors.density_floor { floors.density_floor } else { rho };
        let ekin = self.momentum_squared() / (2.0 * rho_new);
        let mut etot = self.energy_density();

        if !floors.isothermal {
            let p_floor = floors.pressure_floor(rho_new);
            let p_star = (etot - ekin) * (gamma_law_index - 1.0);

            if p_star < p_floor {
                etot = p_floor / (gamma_law_index - 1.0) + ekin;
            }
        }
        Self(rho_new, self.1, self.2, self.3, etot)
    }
}




// ============================================================================
impl Primitive {

    pub fn from_slice(prim: &[f64]) -> Self {
        Self(prim[0], prim[1], prim[2], prim[3], prim[4])
    }

    pub fn write_to_slice(&self, prim: &mut [f64]) {
        prim[0] = self.0;
        prim[1] = self.1;
        prim[2] = self.2;
        prim[3] = self.3;
        prim[4] = self.4;
    }

    pub fn mass_density(&self) -> f64 {
        self.0
    }

    pub fn gas_pressure(&self) -> f64 {
        self.4
    }

    pub fn velocity(&self, axis: Axis) -> f64 {
        match axis {
            Axis::I => self.1,
            Axis::J => self.2,
            Axis::K => self.3,
        }
    }

    pub fn velocity_squared(&self) -> f64 {
        self.1 * self.1 + self.2 * self.2 + self.3 * self.3
    }

    pub fn sound_speed_squared(&self, gamma_law_index: f64) -> f64 {
        gamma_law_index * self.gas_pressure() / self.mass_density()
    }

    pub fn outer_wavespeeds(&self, axis: Axis, gamma_law_index: f64) -> (f64, f64) {
        let cs = self.sound_speed_squared(gamma_law_index).sqrt();
        let vn = self.velocity(axis);
        (vn - cs, vn + cs)
    }

    pub fn max_signal_speed(&self, gamma_law_index: f64) -> f64 {
        f64::sqrt(self.velocity_squared()) + f64::sqrt(self.sound_speed_squared(gamma_law_index))
    }

    pub fn to_conserved(&self, gamma_law_index: f64) -> Conserved {
        let d   = self.mass_density();
        let p   = self.gas_pressure();
        let vsq = self.velocity_squared();

        Conserved(
            d,
            d * self.1,
            d * self.2,
            d * self.3,
            d * vsq * 0.5 + p / (gamma_law_index - 1.0)
        )
    }

    pub fn flux_vector(&self, axis: Axis, gamma_law_index: f64) -> Conserved {
        let pg = self.gas_pressure();
        let vn = self.velocity(axis);
        let u = self.to_conserved(gamma_law_index);
        let along = |a: Axis| if a == axis { 1.0 } else { 0.0 };

        Conserved(
             u.0 * vn,
             u.1 * vn + pg * along(Axis::I),
             u.2 * vn + pg * along(Axis::J),
             u.3 * vn + pg * along(Axis::K),
             u.4 * vn + pg * vn)
    }
}




// ============================================================================
impl Add<Conserved> for Conserved {
    type Output = Conserved;
    fn add(self, u: Self) -> Conserved {
        Conserved(self.0 + u.0, self.1 + u.1, self.2 + u.2, self.3 + u.3, self.4 + u.4)
    }
}

impl Sub<Conserved> for Conserved {
    type Output = Self;
    fn sub(self, u: Self) -> Self {
        Self(self.0 - u.0, self.1 - u.1, self.2 - u.2, self.3 - u.3, self.4 - u.4)
    }
}

impl Mul<f64> for Conserved {
    type Output = Self;
    fn mul(self, a: f64) -> Self {
        Self(self.0 * a, self.1 * a, self.2 * a, self.3 * a, self.4 * a)
    }
}

impl Div<f64> for Conserved {
    type Output = Self;
    fn div(self, a: f64) -> Self {
        Self(self.0 / a, self.1 / a, self.2 / a, self.3 / a, self.4 / a)
    }
}




// ============================================================================
pub fn riemann_hlle(pl: Primitive, pr: Primitive, axis: Axis, gamma_law_index: f64) -> Conserved {
    let ul = pl.to_conserved(gamma_law_index);
    let ur = pr.to_conserved(gamma_law_index);
    let fl = pl.flux_vector(axis, gamma_law_index);
    let fr = pr.flux_vector(axis, gamma_law_index);

    let (alm, alp) = pl.outer_wavespeeds(axis, gamma_law_index);
    let (arm, arp) = pr.outer_wavespeeds(axis, gamma_law_index);
    let ap = alp.max(arp).max(0.0);
    let am = alm.min(arm).min(0.0);

    (fl * ap - fr * am - (ul - ur) * ap * am) / (ap - am)
}
