use std::ops::Range;
use crate::config::HydroFloors;
use crate::error::Error;
use crate::hydro::euler::{riemann_hlle, Conserved, Primitive};
use crate::index_space::Axis;
use crate::integrator::HyperbolicSystem;
use crate::patch::{DirectionalView, Patch};
use crate::reconstruct::flatten;




/**
 * Euler equations for a gamma-law gas. The five hydrodynamic components
 * `(rho, px, py, pz, E)` are the first five of the state; further components
 * (for example the radiation variables) are carried along untouched.
 */
#[derive(Clone, Debug)]
pub struct HydroSystem {
    pub gamma_law_index: f64,
    pub floors: HydroFloors,
    num_components: usize,
}




// ============================================================================
impl HydroSystem {

    pub fn new(gamma_law_index: f64, floors: HydroFloors) -> Self {
        Self { gamma_law_index, floors, num_components: 5 }
    }

    /**
     * Return this system, sized to a state with the given total number of
     * components. Must be at least 5.
     */
    pub fn with_num_components(self, num_components: usize) -> Self {
        assert!(num_components >= 5, "the hydro state needs at least 5 components");
        Self { num_components, ..self }
    }
}




// ============================================================================
impl HyperbolicSystem for HydroSystem {

    fn num_components(&self) -> usize {
        self.num_components
    }

    fn hyperbolic_range(&self) -> Range<usize> {
        0..5
    }

    fn conserved_to_primitive(&self, index: (i64, i64, i64), cons: &[f64], prim: &mut [f64]) -> Result<(), Error> {
        Conserved::from_slice(cons).to_primitive(self.gamma_law_index, index)?.write_to_slice(prim);
        Ok(())
    }

    /**
     * Flatten the interface states near strong shocks (Miller & Colella
     * 2002). Needs two zones of primitive data past the flattening stencil;
     * when the patch is too narrow (fewer than four guard zones) nothing is
     * done.
     */
    fn flatten_shocks(&self, prim: &Patch, axis: Axis, left: &mut Patch, right: &mut Patch) {
        let cells = left.index_space().trim_lower(-1, axis);
        let stencil = cells.extend(1, axis);

        if !prim.index_space().contains_space(&stencil.extend(2, axis)) {
            return
        }
        let view = prim.along(axis);
        let mut raw = Patch::zeros(1, stencil);
        raw.par_for_each_mut(|index, c| c[0] = flattening_coefficient(&view, index));

        let raw = raw.along(axis);
        let mut chi = Patch::zeros(1, cells);
        chi.par_for_each_mut(|index, c| {
            c[0] = raw.get(index, -1, 0).min(raw.get(index, 0, 0)).min(raw.get(index, 1, 0))
        });
        flatten(prim, &chi, axis, left, right)
    }

    fn riemann(
        &self,
        cons: &DirectionalView,
        _face: (i64, i64, i64),
        left: &[f64],
        right: &[f64],
        _dx: f64,
        flux: &mut [f64],
        diffusive: &mut [f64])
    {
        let pl = Primitive::from_slice(left);
        let pr = Primitive::from_slice(right);
        let f = riemann_hlle(pl, pr, cons.axis(), self.gamma_law_index);
        f.write_to_slice(flux);
        f.write_to_slice(diffusive);
    }

    fn is_state_valid(&self, cons: &[f64]) -> bool {
        cons[0] > 0.0 && cons[4].is_finite()
    }

    fn max_signal_speed(&self, cons: &[f64]) -> f64 {
        let u = Conserved::from_slice(cons);
        let rho = u.mass_density();
        let pg = (u.internal_energy_density() * (self.gamma_law_index - 1.0)).max(0.0);
        (u.momentum_squared() / (rho * rho)).sqrt() + (self.gamma_law_index * pg / rho).sqrt()
    }

    fn enforce_limits(&self, cons: &mut [f64]) {
        Conserved::from_slice(cons)
            .with_floors(&self.floors, self.gamma_law_index)
            .write_to_slice(cons)
    }
}




/**
 * Unlimited flattening coefficient of one zone, from the width and strength
 * of the pressure jump across it. Only compressive zones are flattened.
 */
fn flattening_coefficient(prim: &DirectionalView, index: (i64, i64, i64)) -> f64 {
    const BETA_MIN: f64 = 0.75;
    const BETA_MAX: f64 = 0.85;
    const Z_MIN: f64 = 0.5;
    const Z_MAX: f64 = 0.75;

    let p = |d: i64| prim.get(index, d, 4);
    let vn = |d: i64| prim.get(index, d, 1 + prim.axis().index());

    if vn(1) >= vn(-1) {
        return 1.0
    }
    let dp1 = p(1) - p(-1);
    let dp2 = p(2) - p(-2);
    let beta = if dp1 == 0.0 { 0.0 } else { (dp1 / dp2).abs() };
    let z = dp1.abs() / p(1).min(p(-1));

    let chi_beta = ((BETA_MAX - beta) / (BETA_MAX - BETA_MIN)).clamp(0.0, 1.0);
    let chi_z = ((Z_MAX - z) / (Z_MAX - Z_MIN)).clamp(0.0, 1.0);
    chi_beta.max(chi_z)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::boundary::Boundary;
    use crate::config::IntegratorConfig;
    use crate::index_space::range1d;
    use crate::integrator::Integrator;
    use crate::mesh::Mesh;

    const GAMMA: f64 = 1.4;

    fn shocktube(x: (f64, f64, f64), s: &mut [f64]) {
        let p = if x.0 < 0.5 { Primitive(10.0, 0.0, 0.0, 0.0, 100.0) } else { Primitive(1.0, 0.0, 0.0, 0.0, 1.0) };
        p.to_conserved(GAMMA).write_to_slice(s)
    }

    #[test]
    fn flattening_vanishes_at_a_strong_compression() {
        let prim = Patch::from_slice_function(range1d(-4..12), 5, |(i, _, _), s| {
            let p = if i < 4 { Primitive(4.0, 1.0, 0.0, 0.0, 100.0) } else { Primitive(1.0, 0.0, 0.0, 0.0, 1.0) };
            p.write_to_slice(s)
        });
        let view = prim.along(Axis::I);
        assert_eq!(flattening_coefficient(&view, (3, 0, 0)), 0.0);
        assert_eq!(flattening_coefficient(&view, (4, 0, 0)), 0.0);
        assert_eq!(flattening_coefficient(&view, (0, 0, 0)), 1.0);
        assert_eq!(flattening_coefficient(&view, (8, 0, 0)), 1.0);
    }

    #[test]
    fn expanding_flow_is_never_flattened() {
        let prim = Patch::from_slice_function(range1d(-4..12), 5, |(i, _, _), s| {
            let p = if i < 4 { Primitive(4.0, -1.0, 0.0, 0.0, 100.0) } else { Primitive(1.0, 1.0, 0.0, 0.0, 1.0) };
            p.write_to_slice(s)
        });
        assert_eq!(flattening_coefficient(&prim.along(Axis::I), (4, 0, 0)), 1.0);
    }

    #[test]
    fn floors_are_applied_after_each_stage() {
        let floors = HydroFloors { density_floor: 1e-3, ..Default::default() };
        let system = HydroSystem::new(GAMMA, floors);
        let mut cons = [1e-6, 1e-6, 0.0, 0.0, 1.0];
        system.enforce_limits(&mut cons);
        assert_eq!(cons[0], 1e-3);
        assert_eq!(cons[1], 1e-6);
        assert!(system.is_state_valid(&cons));
    }

    #[test]
    fn shocktube_conserves_mass_and_stays_bounded() {
        let system = HydroSystem::new(GAMMA, HydroFloors::default());
        let mut integrator = Integrator::new(system, Boundary::default(), Mesh::line(0.0, 1.0, 200), IntegratorConfig::default()).unwrap();
        let mut state = integrator.state_from_function(shocktube);
        let valid = integrator.valid_space();
        let mass = |s: &Patch| valid.iter().map(|i| s.get(i, 0)).sum::<f64>();
        let m0 = mass(&state);

        while integrator.time < 0.05 {
            let dt = integrator.compute_timestep(&state, 0.05 - integrator.time);
            integrator.advance_timestep(&mut state, dt).unwrap();
        }
        assert!((mass(&state) / m0 - 1.0).abs() < 1e-12);

        for index in valid.iter() {
            let rho = state.get(index, 0);
            assert!(rho > 0.5 && rho < 10.5);
        }
    }

    #[test]
    fn extra_components_are_carried_unchanged() {
        let system = HydroSystem::new(GAMMA, HydroFloors::default()).with_num_components(7);
        let mut integrator = Integrator::new(system, Boundary::default(), Mesh::line(0.0, 1.0, 32), IntegratorConfig::default()).unwrap();
        let mut state = integrator.state_from_function(|x, s| {
            shocktube(x, &mut s[..5]);
            s[5] = 3.0;
            s[6] = -2.0;
        });
        let dt = integrator.compute_timestep(&state, f64::INFINITY);
        integrator.advance_timestep(&mut state, dt).unwrap();

        for index in integrator.valid_space().iter() {
            assert_eq!(&state.get_slice(index)[5..], &[3.0, -2.0]);
        }
    }
}
