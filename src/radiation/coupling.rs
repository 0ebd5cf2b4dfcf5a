use crate::config::NewtonConfig;
use crate::error::Error;
use super::material::Material;
use super::{GAS_DENSITY, GAS_ENERGY, RAD_ENERGY, X1_GAS_MOMENTUM, X1_RAD_FLUX};




/**
 * Result of the Newton-Raphson solve for the gas and radiation energy
 * densities of a single zone
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NewtonOutcome {
    Converged {
        egas: f64,
        erad: f64,
        kappa: f64,
        iterations: usize,
    },
    NotConverged {
        egas: f64,
        erad: f64,
        tgas: f64,
        iterations: usize,
    },
}




/**
 * Solve the implicit emission-absorption exchange between the gas internal
 * energy `egas0` and the radiation energy `erad0` of one zone over the
 * timestep `dt`, following Howell & Greenough (2003). The unknowns satisfy
 *
 *   F_G = (Eg - Eg0) + (c / chat) rhs = 0
 *   F_R = (Er - Er0) - (rhs + src)    = 0
 *
 * with `rhs = dt rho kappa (4 pi B(T) - chat Er)`. The residuals are tested
 * against the tolerance (relative to the total energy) before each Newton
 * step, so an initial guess already in balance returns after zero
 * iterations. The 2x2 Jacobian system is reduced by eliminating the gas
 * energy update.
 *
 * Nothing here is fatal; the caller decides what to do with an unconverged
 * solve.
 */
pub fn solve_energy_exchange<M: Material + ?Sized>(
    material: &M,
    rho: f64,
    egas0: f64,
    erad0: f64,
    src: f64,
    dt: f64,
    config: &NewtonConfig) -> NewtonOutcome
{
    let constants = material.constants();
    let c = constants.c_light;
    let chat = constants.c_hat;
    let a_rad = constants.radiation_constant;
    let etot0 = egas0 + (c / chat) * erad0;

    let mut egas = egas0;
    let mut erad = erad0;
    let mut tgas = material.tgas_from_egas(rho, egas);

    for n in 0..config.max_iterations {
        tgas = material.tgas_from_egas(rho, egas);

        let kappa = material.opacity(rho, tgas);
        let four_pi_b = chat * a_rad * tgas.powi(4);
        let rhs = dt * (rho * kappa) * (four_pi_b - chat * erad);
        let f_g = (egas - egas0) + (c / chat) * rhs;
        let f_r = (erad - erad0) - (rhs + src);

        if (f_g / etot0).abs() < config.tolerance && (f_r / etot0).abs() < config.tolerance {
            return NewtonOutcome::Converged { egas, erad, kappa, iterations: n }
        }

        let db_dt = (4.0 * four_pi_b) / tgas;
        let dkappa_dt = material.opacity_temp_derivative(rho, tgas);
        let c_v = material.egas_temp_derivative(rho, tgas);
        let drhs_degas = (rho * dt / c_v) * (kappa * db_dt + dkappa_dt * (four_pi_b - chat * erad));

        let dfg_degas = 1.0 + (c / chat) * drhs_degas;
        let dfg_derad = dt * (-(rho * kappa) * c);
        let dfr_degas = -drhs_degas;
        let dfr_derad = 1.0 + dt * ((rho * kappa) * chat);

        let eta = -dfr_degas / dfg_degas;
        let delta_erad = -(f_r + eta * f_g) / (dfr_derad + eta * dfg_derad);
        let delta_egas = -(f_g + dfg_derad * delta_erad) / dfg_degas;

        if !(delta_erad.is_finite() && delta_egas.is_finite()) {
            return NewtonOutcome::NotConverged { egas, erad, tgas, iterations: n }
        }
        egas += delta_egas;
        erad += delta_erad;
    }
    NewtonOutcome::NotConverged { egas, erad, tgas, iterations: config.max_iterations }
}




/**
 * Apply the implicit radiation-matter coupling to the 9-component conserved
 * state of one zone, in place.
 *
 * The gas and radiation energies come from `solve_energy_exchange`, with the
 * source `dt (chat rad_source + advection[0])`. The radiation flux is then
 * relaxed implicitly in the opacity, `F1 = (F0 + dt advection[1..]) / (1 +
 * rho kappa chat dt)`, and the gas receives the lost radiation momentum
 * `-(F1 - F0) / (c chat)`. The gas kinetic energy changes by `v0 . dp`.
 *
 * `advection` holds cached transport fluxes of the energy and the three flux
 * components, used by the well-balanced (SDC) integrator; pass zeros
 * otherwise.
 */
pub fn update_zone<M: Material + ?Sized>(
    material: &M,
    cons: &mut [f64],
    rad_source: f64,
    advection: [f64; 4],
    dt: f64,
    config: &NewtonConfig,
    index: (i64, i64, i64)) -> Result<(), Error>
{
    let constants = material.constants();
    let c = constants.c_light;
    let chat = constants.c_hat;

    let rho = cons[GAS_DENSITY];
    let mom0 = [cons[X1_GAS_MOMENTUM], cons[X1_GAS_MOMENTUM + 1], cons[X1_GAS_MOMENTUM + 2]];
    let vel0 = [mom0[0] / rho, mom0[1] / rho, mom0[2] / rho];
    let ekin0 = (mom0[0] * mom0[0] + mom0[1] * mom0[1] + mom0[2] * mom0[2]) / (2.0 * rho);
    let egas0 = cons[GAS_ENERGY] - ekin0;
    let erad0 = cons[RAD_ENERGY];

    if !(egas0 > 0.0 && erad0 > 0.0) {
        return Err(Error::NonPositiveEnergy { index, egas: egas0, erad: erad0 })
    }
    let src = dt * ((chat * rad_source) + advection[0]);

    match solve_energy_exchange(material, rho, egas0, erad0, src, dt, config) {
        NewtonOutcome::NotConverged { egas, erad, tgas, iterations } => {
            Err(Error::CouplingNotConverged { index, iterations, rho, tgas, egas, erad })
        }
        NewtonOutcome::Converged { egas, erad, kappa, .. } => {
            if !(egas > 0.0 && erad > 0.0) {
                return Err(Error::NonPositiveEnergy { index, egas, erad })
            }
            cons[RAD_ENERGY] = erad;
            cons[GAS_ENERGY] = egas + ekin0;

            for n in 0..3 {
                let f0 = cons[X1_RAD_FLUX + n];
                let f1 = (f0 + (dt * advection[1 + n])) / (1.0 + (rho * kappa) * chat * dt);
                let dmom = -(f1 - f0) / (c * chat);

                cons[X1_RAD_FLUX + n] = f1;
                cons[X1_GAS_MOMENTUM + n] += dmom;
                cons[GAS_ENERGY] += vel0[n] * dmom;
            }
            Ok(())
        }
    }
}




/**
 * Explicit (forward Euler) source terms of one zone: the emission minus
 * absorption term for the radiation energy, plus any external source,
 * followed by the opacity damping `-dt chat rho kappa F` of each flux
 * component. The state is not modified.
 */
pub fn explicit_source_terms<M: Material + ?Sized>(
    material: &M,
    cons: &[f64],
    rad_source: f64,
    dt: f64) -> [f64; 4]
{
    let constants = material.constants();
    let chat = constants.c_hat;
    let rho = cons[GAS_DENSITY];
    let p = &cons[X1_GAS_MOMENTUM..X1_GAS_MOMENTUM + 3];
    let egas0 = cons[GAS_ENERGY] - (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]) / (2.0 * rho);

    let tgas = material.tgas_from_egas(rho, egas0);
    let kappa = material.opacity(rho, tgas);
    let four_pi_b = chat * constants.radiation_constant * tgas.powi(4);
    let rhs = dt * (rho * kappa) * (four_pi_b - chat * cons[RAD_ENERGY]) + dt * chat * rad_source;

    let mut src = [rhs, 0.0, 0.0, 0.0];

    for n in 0..3 {
        src[1 + n] = -dt * chat * (rho * kappa) * cons[X1_RAD_FLUX + n];
    }
    src
}
