use std::ops::Range;
use log::{debug, info};
use rayon::prelude::*;
use crate::boundary::{BoundaryFill, SimulationMetadata};
use crate::config::{IntegratorConfig, TimeIntegrator};
use crate::error::Error;
use crate::index_space::{Axis, IndexSpace};
use crate::mesh::Mesh;
use crate::patch::{DirectionalView, Patch};
use crate::reconstruct::reconstruct;




/// Largest number of conserved components a system may carry per zone.
pub const MAX_COMPONENTS: usize = 16;




/**
 * A system of conservation laws that can be advanced by the `Integrator`.
 * Only the components in `hyperbolic_range` are transported; the others are
 * carried along unchanged by the hyperbolic update, so that several systems
 * can be operator-split on one state.
 *
 * All slices named `cons` hold every component of a zone. Primitive and
 * flux slices hold only the hyperbolic components.
 */
pub trait HyperbolicSystem: Sync {

    fn num_components(&self) -> usize;

    fn hyperbolic_range(&self) -> Range<usize>;

    fn num_primitive(&self) -> usize {
        self.hyperbolic_range().len()
    }

    /**
     * Convert the conserved state of one zone to the primitive variables that
     * are reconstructed.
     */
    fn conserved_to_primitive(&self, index: (i64, i64, i64), cons: &[f64], prim: &mut [f64]) -> Result<(), Error>;

    /**
     * Reduce the reconstruction order near shocks. The default does nothing.
     */
    fn flatten_shocks(&self, _prim: &Patch, _axis: Axis, _left: &mut Patch, _right: &mut Patch) {
    }

    /**
     * Compute the numerical flux through `face` (the left edge of the zone
     * at the same index), given the reconstructed primitive states on either
     * side. The conserved state is available through `cons` for fallbacks.
     * The solver writes both its primary flux and a more diffusive flux,
     * which replaces it in zones where the primary update is not valid.
     */
    fn riemann(
        &self,
        cons: &DirectionalView,
        face: (i64, i64, i64),
        left: &[f64],
        right: &[f64],
        dx: f64,
        flux: &mut [f64],
        diffusive: &mut [f64]);

    fn is_state_valid(&self, cons: &[f64]) -> bool;

    fn max_signal_speed(&self, cons: &[f64]) -> f64;

    /**
     * Apply floors to a zone after a hyperbolic stage. The default does
     * nothing.
     */
    fn enforce_limits(&self, _cons: &mut [f64]) {
    }

    /**
     * Apply the local source terms over `dt` to the zones of `cells`. The
     * default does nothing.
     */
    fn add_source_terms(&self, _state: &mut Patch, _cells: &IndexSpace, _dt: f64, _metadata: &SimulationMetadata) -> Result<(), Error> {
        Ok(())
    }
}




/**
 * Fluxes through the faces normal to one axis. The first `hyperbolic_range`
 * fields of each face hold the primary flux, and the next ones the diffusive
 * flux.
 */
pub struct FaceFluxes {
    pub axis: Axis,
    pub dx: f64,
    pub flux: Patch,
}




/**
 * Advances a single patch of a hyperbolic system over one mesh, and keeps
 * track of the simulation time. The integrator owns no state array; the
 * caller allocates it (normally with `allocate_state`) and passes it in.
 */
pub struct Integrator<S, B> {
    pub system: S,
    pub boundary: B,
    pub mesh: Mesh,
    pub config: IntegratorConfig,
    pub time: f64,
    pub dt: f64,
    pub dt_prev: f64,
    pub cycle: u64,
    pub metadata: SimulationMetadata,
}




// ============================================================================
impl<S: HyperbolicSystem, B: BoundaryFill> Integrator<S, B> {

    pub fn new(system: S, boundary: B, mesh: Mesh, config: IntegratorConfig) -> Result<Self, Error> {
        config.validate()?;
        mesh.validate()?;

        let range = system.hyperbolic_range();

        if system.num_components() > MAX_COMPONENTS || range.end > system.num_components() || range.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "system has {} components and hyperbolic range {:?}",
                system.num_components(),
                range)))
        }
        if system.num_primitive() < range.len() {
            return Err(Error::InvalidConfig("system needs at least one primitive per hyperbolic component".into()))
        }
        Ok(Self {
            system,
            boundary,
            mesh,
            config,
            time: 0.0,
            dt: 0.0,
            dt_prev: 0.0,
            cycle: 0,
            metadata: SimulationMetadata::default(),
        })
    }

    /**
     * The interior zones of the mesh, which the integrator updates.
     */
    pub fn valid_space(&self) -> IndexSpace {
        self.mesh.index_space()
    }

    /**
     * Allocate a zeroed state covering the interior zones plus the guard
     * layer.
     */
    pub fn allocate_state(&self) -> Patch {
        let space = self.mesh.grow(&self.valid_space(), self.config.num_guard);
        Patch::zeros(self.system.num_components(), space)
    }

    /**
     * Allocate a state covering the interior zones plus the guard layer, with
     * values set by a closure of the cell center.
     */
    pub fn state_from_function<F>(&self, f: F) -> Patch
    where
        F: Fn((f64, f64, f64), &mut [f64])
    {
        let space = self.mesh.grow(&self.valid_space(), self.config.num_guard);
        Patch::from_slice_function(space, self.system.num_components(), |index, s| f(self.mesh.cell_center(index), s))
    }

    pub fn fill_guard_zones(&self, state: &mut Patch) {
        self.boundary.fill(state, &self.valid_space(), &self.mesh, &self.metadata)
    }

    /**
     * Compute the primary and diffusive fluxes through every face normal to
     * `axis` that bounds an interior zone. The guard zones of `state` must
     * already be filled.
     */
    pub fn compute_fluxes(&self, state: &Patch, axis: Axis) -> Result<FaceFluxes, Error> {
        let system = &self.system;
        let nh = system.hyperbolic_range().len();
        let np = system.num_primitive();

        let mut prim = Patch::zeros(np, state.index_space().clone());
        let all = state.index_space().clone();

        prim.par_try_for_each_mut_in(&all, |index, p| system.conserved_to_primitive(index, state.get_slice(index), p))?;

        let faces = self.valid_space().extend_upper(1, axis);
        let mut left = Patch::zeros(np, faces.clone());
        let mut right = Patch::zeros(np, faces.clone());

        reconstruct(self.config.reconstruction, &prim, axis, &mut left, &mut right);
        system.flatten_shocks(&prim, axis, &mut left, &mut right);

        let view = state.along(axis);
        let dx = self.mesh.cell_spacing(axis);
        let mut flux = Patch::zeros(2 * nh, faces);

        flux.par_for_each_mut(|face, f| {
            let (primary, diffusive) = f.split_at_mut(nh);
            system.riemann(&view, face, left.get_slice(face), right.get_slice(face), dx, primary, diffusive)
        });
        Ok(FaceFluxes { axis, dx, flux })
    }

    fn compute_all_fluxes(&self, state: &Patch) -> Result<Vec<FaceFluxes>, Error> {
        self.mesh.active_axes().map(|axis| self.compute_fluxes(state, axis)).collect()
    }

    /**
     * Forward Euler update of the interior zones of `state`, in place:
     * `U <- U + dt div(F)`. Zones left invalid by the primary fluxes are
     * recomputed with the diffusive fluxes, and the system floors are
     * applied. A zone which is still invalid is an error.
     */
    pub fn predict_step(&self, state: &mut Patch, fluxes: &[FaceFluxes], dt: f64) -> Result<(), Error> {
        self.update_zones(state, None, fluxes, dt, "predict")
    }

    /**
     * Second stage of SSP-RK2, in place: `U <- U/2 + U1/2 + dt/2 div(F(U1))`,
     * with the same fallback and floors as `predict_step`.
     */
    pub fn add_fluxes_rk2(&self, state: &mut Patch, stage: &Patch, fluxes: &[FaceFluxes], dt: f64) -> Result<(), Error> {
        self.update_zones(state, Some(stage), fluxes, dt, "RK2 combine")
    }

    fn update_zones(
        &self,
        state: &mut Patch,
        stage: Option<&Patch>,
        fluxes: &[FaceFluxes],
        dt: f64,
        label: &'static str) -> Result<(), Error>
    {
        let system = &self.system;
        let nc = system.num_components();
        let nh = system.hyperbolic_range().len();
        let weight = if stage.is_some() { 0.5 } else { 1.0 };

        state.par_try_for_each_mut_in(&self.valid_space(), |index, u| {
            let mut base = [0.0; MAX_COMPONENTS];
            let base = &mut base[..nc];

            match stage {
                Some(u1) => {
                    for ((b, u0), u1) in base.iter_mut().zip(u.iter()).zip(u1.get_slice(index)) {
                        *b = 0.5 * u0 + 0.5 * u1
                    }
                }
                None => base.copy_from_slice(u),
            }
            self.apply_divergence(base, fluxes, index, weight * dt, 0, u);

            if !system.is_state_valid(u) {
                self.apply_divergence(base, fluxes, index, weight * dt, nh, u);
            }
            system.enforce_limits(u);

            if system.is_state_valid(u) {
                Ok(())
            } else {
                Err(Error::NonRealizableState { stage: label, index })
            }
        })
    }

    fn apply_divergence(&self, base: &[f64], fluxes: &[FaceFluxes], index: (i64, i64, i64), dt: f64, offset: usize, u: &mut [f64]) {
        let range = self.system.hyperbolic_range();
        u.copy_from_slice(base);

        for f in fluxes {
            let lower = f.flux.get_slice(index);
            let upper = f.flux.get_slice(f.axis.shift(index, 1));

            for (n, c) in range.clone().enumerate() {
                u[c] += (dt / f.dx) * (lower[offset + n] - upper[offset + n])
            }
        }
    }

    /**
     * Largest stable timestep for the interior zones of `state`: the Courant
     * number times the smallest zone width over the largest signal speed.
     * The step may grow by at most `dt_expand_factor` from the previous one,
     * and never exceeds `dt_max`.
     */
    pub fn compute_timestep(&self, state: &Patch, dt_max: f64) -> f64 {
        let system = &self.system;
        let valid = self.valid_space();
        let space = state.index_space();

        let max_signal = state
            .data()
            .par_chunks_exact(state.num_fields())
            .enumerate()
            .filter(|(offset, _)| valid.contains(space.index_at_offset(*offset)))
            .map(|(_, cons)| system.max_signal_speed(cons))
            .reduce(|| 0.0, f64::max);

        let mut dt = self.config.cfl_number * self.mesh.smallest_spacing() / max_signal;

        if self.dt_prev > 0.0 && dt > self.config.dt_expand_factor * self.dt_prev {
            debug!("limiting dt {:.4e} to {:.4e} by the growth factor", dt, self.config.dt_expand_factor * self.dt_prev);
            dt = self.config.dt_expand_factor * self.dt_prev;
        }
        dt.min(dt_max)
    }

    /**
     * Advance `state` by `dt` with the configured time integrator, and update
     * the time, cycle count, and metadata on success.
     */
    pub fn advance_timestep(&mut self, state: &mut Patch, dt: f64) -> Result<(), Error> {
        match self.config.time_integrator {
            TimeIntegrator::Rk2 => self.advance_rk2(state, dt)?,
            TimeIntegrator::Sdc2 => self.advance_sdc2(state, dt)?,
        }
        self.time += dt;
        self.dt = dt;
        self.dt_prev = dt;
        self.cycle += 1;
        self.metadata.time = self.time;
        self.metadata.cycle = self.cycle;
        Ok(())
    }

    /**
     * SSP-RK2 update of the hyperbolic terms, followed by the source terms
     * (operator split). On error the interior zones are left as they were.
     */
    pub fn advance_rk2(&self, state: &mut Patch, dt: f64) -> Result<(), Error> {
        self.fill_guard_zones(state);
        let fluxes = self.compute_all_fluxes(state)?;

        let mut stage = state.clone();
        self.predict_step(&mut stage, &fluxes, dt)?;

        self.fill_guard_zones(&mut stage);
        let fluxes = self.compute_all_fluxes(&stage)?;

        let mut next = state.clone();
        self.add_fluxes_rk2(&mut next, &stage, &fluxes, dt)?;
        self.system.add_source_terms(&mut next, &self.valid_space(), dt, &self.metadata)?;

        *state = next;
        Ok(())
    }

    /**
     * Fixed-point (SDC2) update: each iteration recomputes the transport
     * fluxes from the previous iterate, predicts from the state at the start
     * of the step, and applies the source terms. The iteration stops when
     * the residual between successive iterates falls below the configured
     * tolerance. Failing to converge within the iteration cap is an error,
     * and the state is left as it was.
     */
    pub fn advance_sdc2(&self, state: &mut Patch, dt: f64) -> Result<(), Error> {
        let valid = self.valid_space();
        let mut prev = state.clone();
        let mut residual = f64::INFINITY;

        for iteration in 0..self.config.sdc_max_iterations {
            self.fill_guard_zones(&mut prev);
            let fluxes = self.compute_all_fluxes(&prev)?;

            let mut predict = state.clone();
            self.predict_step(&mut predict, &fluxes, dt)?;
            self.system.add_source_terms(&mut predict, &valid, dt, &self.metadata)?;

            if let Some(index) = valid.iter().find(|i| !self.system.is_state_valid(predict.get_slice(*i))) {
                return Err(Error::NonRealizableState { stage: "SDC source update", index })
            }
            residual = self.compute_residual(&predict, &prev);
            debug!("SDC iteration {}: residual {:.4e}", iteration, residual);
            prev = predict;

            if residual < self.config.sdc_tolerance {
                info!("SDC converged after {} iterations (residual {:.4e})", iteration + 1, residual);
                *state = prev;
                return Ok(())
            }
        }
        Err(Error::SdcNotConverged { residual, iterations: self.config.sdc_max_iterations })
    }

    /**
     * Distance between two states over the interior zones: the Euclidean norm,
     * taken over components, of the mean absolute difference of each
     * component.
     */
    pub fn compute_residual(&self, a: &Patch, b: &Patch) -> f64 {
        let valid = self.valid_space();
        let nc = self.system.num_components();
        let mut sums = [0.0; MAX_COMPONENTS];

        for index in valid.iter() {
            for (s, (x, y)) in sums.iter_mut().zip(a.get_slice(index).iter().zip(b.get_slice(index))) {
                *s += (x - y).abs()
            }
        }
        let n = valid.len() as f64;
        sums[..nc].iter().map(|s| (s / n).powi(2)).sum::<f64>().sqrt()
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::boundary::Boundary;
    use crate::config::{HydroFloors, NewtonConfig, RadiationConstants};
    use crate::hydro::euler::Primitive;
    use crate::radiation::{closure::reduced_flux_magnitude, GreyMaterial};
    use crate::reconstruct::Reconstruction;
    use crate::solvers::{hydro::HydroSystem, radiation::RadiationSystem};

    fn radiation(kappa: f64) -> RadiationSystem<GreyMaterial> {
        let constants = RadiationConstants { c_light: 1.0, c_hat: 1.0, radiation_constant: 1.0, ..Default::default() };
        RadiationSystem::new(GreyMaterial { constants, kappa }, NewtonConfig::default())
    }

    fn pulse(x: (f64, f64, f64), s: &mut [f64]) {
        let e = 1.0 + (-((x.0 - 0.5) / 0.1).powi(2)).exp();
        s.copy_from_slice(&[1.0, 0.0, 0.0, 0.0, 1.0, e, 0.0, 0.0, 0.0]);
    }

    fn spike(x: (f64, f64, f64), s: &mut [f64]) {
        let e = if (x.0 - 0.5).abs() < 0.02 { 10.0 } else { 1e-3 };
        s.copy_from_slice(&[1.0, 0.0, 0.0, 0.0, 1.0, e, 0.0, 0.0, 0.0]);
    }

    fn same_interior<S: HyperbolicSystem, B: BoundaryFill>(integrator: &Integrator<S, B>, a: &Patch, b: &Patch) -> bool {
        integrator.valid_space().iter().all(|i| a.get_slice(i) == b.get_slice(i))
    }

    #[test]
    fn uniform_flow_is_a_steady_state() {
        let system = HydroSystem::new(1.4, HydroFloors::default());
        let mut integrator = Integrator::new(system, Boundary::periodic(), Mesh::line(0.0, 1.0, 32), IntegratorConfig::default()).unwrap();
        let mut state = integrator.state_from_function(|_, s| {
            Primitive(1.0, 0.3, -0.2, 0.1, 1.0).to_conserved(1.4).write_to_slice(s)
        });
        let initial = state.clone();
        let dt = integrator.compute_timestep(&state, f64::INFINITY);

        integrator.advance_timestep(&mut state, dt).unwrap();

        assert!(same_interior(&integrator, &state, &initial));
        assert_eq!(integrator.cycle, 1);
        assert_eq!(integrator.time, dt);
    }

    #[test]
    fn transparent_radiation_stays_causal() {
        let mut integrator = Integrator::new(radiation(0.0), Boundary::periodic(), Mesh::line(0.0, 1.0, 64), IntegratorConfig::default()).unwrap();
        let mut state = integrator.state_from_function(pulse);
        let total: f64 = integrator.valid_space().iter().map(|i| state.get(i, 5)).sum();

        for _ in 0..4 {
            let dt = integrator.compute_timestep(&state, f64::INFINITY);
            integrator.advance_timestep(&mut state, dt).unwrap();
        }
        for index in integrator.valid_space().iter() {
            let s = state.get_slice(index);
            assert!(s[5] > 0.0);
            assert!(reduced_flux_magnitude([s[6] / s[5], s[7] / s[5], s[8] / s[5]]) <= 1.0 + 1e-12);
        }
        let after: f64 = integrator.valid_space().iter().map(|i| state.get(i, 5)).sum();
        assert!((after / total - 1.0).abs() < 1e-12);
    }

    fn box_mesh(n: i64, dimensionality: usize) -> Mesh {
        let nk = if dimensionality == 3 { n } else { 1 };
        Mesh { lower: (0.0, 0.0, 0.0), upper: (1.0, 1.0, 1.0), size: (n, n, nk), dimensionality }
    }

    #[test]
    fn two_dimensional_pulse_stays_symmetric_across_the_diagonal() {
        let mut integrator = Integrator::new(radiation(1.0), Boundary::periodic(), box_mesh(16, 2), IntegratorConfig::default()).unwrap();
        let mut state = integrator.state_from_function(|x, s| {
            let r2 = (x.0 - 0.4).powi(2) + (x.1 - 0.4).powi(2);
            let e = 1.0 + (-r2 / 0.02).exp();
            s.copy_from_slice(&[1.0, 0.0, 0.0, 0.0, 1.0, e, 0.0, 0.0, 0.0]);
        });
        let valid = integrator.valid_space();
        let momentum = |s: &Patch, n: usize| valid.iter().map(|i| s.get(i, 1 + n) + s.get(i, 6 + n)).sum::<f64>();

        for _ in 0..5 {
            let dt = integrator.compute_timestep(&state, f64::INFINITY);
            integrator.advance_timestep(&mut state, dt).unwrap();
        }
        for (i, j, k) in valid.iter() {
            let a = state.get_slice((i, j, k));
            let b = state.get_slice((j, i, k));
            assert!((a[5] - b[5]).abs() < 1e-12);
            assert!((a[6] - b[7]).abs() < 1e-12);
            assert!((a[1] - b[2]).abs() < 1e-12);
            assert!(a[8] == 0.0);
        }
        assert!(valid.iter().any(|i| state.get(i, 6).abs() > 1e-6));
        assert!(momentum(&state, 0).abs() < 1e-12);
        assert!(momentum(&state, 1).abs() < 1e-12);
    }

    #[test]
    fn uniform_flow_in_three_dimensions_is_a_steady_state() {
        let system = HydroSystem::new(1.4, HydroFloors::default());
        let mut integrator = Integrator::new(system, Boundary::periodic(), box_mesh(8, 3), IntegratorConfig::default()).unwrap();
        let mut state = integrator.state_from_function(|_, s| {
            Primitive(1.0, 0.3, -0.2, 0.1, 1.0).to_conserved(1.4).write_to_slice(s)
        });
        let initial = state.clone();

        for _ in 0..2 {
            let dt = integrator.compute_timestep(&state, f64::INFINITY);
            integrator.advance_timestep(&mut state, dt).unwrap();
        }
        assert!(same_interior(&integrator, &state, &initial));
    }

    #[test]
    fn timestep_respects_the_growth_limit_and_cap() {
        let mut integrator = Integrator::new(radiation(0.0), Boundary::default(), Mesh::line(0.0, 1.0, 10), IntegratorConfig::default()).unwrap();
        let state = integrator.state_from_function(pulse);

        assert!((integrator.compute_timestep(&state, f64::INFINITY) - 0.03).abs() < 1e-15);
        assert_eq!(integrator.compute_timestep(&state, 0.01), 0.01);

        integrator.dt_prev = 0.01;
        assert!((integrator.compute_timestep(&state, f64::INFINITY) - 0.012).abs() < 1e-15);
    }

    #[test]
    fn oversized_timestep_is_not_realizable() {
        let mut integrator = Integrator::new(radiation(0.0), Boundary::periodic(), Mesh::line(0.0, 1.0, 32), IntegratorConfig::default()).unwrap();
        let mut state = integrator.state_from_function(spike);
        let initial = state.clone();
        let result = integrator.advance_timestep(&mut state, 10.0 / 32.0);

        assert!(matches!(result, Err(Error::NonRealizableState { stage: "predict", .. })));
        assert!(same_interior(&integrator, &state, &initial));
        assert_eq!(integrator.cycle, 0);
    }

    #[test]
    fn sdc_iteration_converges_and_conserves_energy() {
        let config = IntegratorConfig {
            cfl_number: 0.1,
            reconstruction: Reconstruction::Constant,
            time_integrator: TimeIntegrator::Sdc2,
            ..Default::default()
        };
        let mut integrator = Integrator::new(radiation(0.0), Boundary::periodic(), Mesh::line(0.0, 1.0, 32), config).unwrap();
        let mut state = integrator.state_from_function(pulse);
        let total: f64 = integrator.valid_space().iter().map(|i| state.get(i, 5)).sum();
        let dt = integrator.compute_timestep(&state, f64::INFINITY);

        integrator.advance_timestep(&mut state, dt).unwrap();

        let after: f64 = integrator.valid_space().iter().map(|i| state.get(i, 5)).sum();
        assert!((after / total - 1.0).abs() < 1e-12);
        assert_eq!(integrator.cycle, 1);
    }

    #[test]
    fn sdc_iteration_cap_is_an_error() {
        let config = IntegratorConfig {
            reconstruction: Reconstruction::Linear,
            time_integrator: TimeIntegrator::Sdc2,
            sdc_max_iterations: 2,
            ..Default::default()
        };
        let mut integrator = Integrator::new(radiation(0.0), Boundary::periodic(), Mesh::line(0.0, 1.0, 32), config).unwrap();
        let mut state = integrator.state_from_function(pulse);
        let initial = state.clone();
        let dt = integrator.compute_timestep(&state, f64::INFINITY);

        let result = integrator.advance_timestep(&mut state, dt);
        assert!(matches!(result, Err(Error::SdcNotConverged { iterations: 2, .. })));
        assert!(same_interior(&integrator, &state, &initial));
    }

    #[test]
    fn residual_is_zero_for_identical_states() {
        let integrator = Integrator::new(radiation(1.0), Boundary::default(), Mesh::line(0.0, 1.0, 8), IntegratorConfig::default()).unwrap();
        let a = integrator.state_from_function(pulse);
        let mut b = a.clone();
        assert_eq!(integrator.compute_residual(&a, &b), 0.0);

        for index in integrator.valid_space().iter() {
            b.set(index, 0, 2.0);
            b.set(index, 5, b.get(index, 5) + 1.0);
        }
        assert!((integrator.compute_residual(&a, &b) - 2f64.sqrt()).abs() < 1e-14);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let config = IntegratorConfig { cfl_number: 1.5, ..Default::default() };
        assert!(Integrator::new(radiation(1.0), Boundary::default(), Mesh::line(0.0, 1.0, 8), config).is_err());
    }
}
