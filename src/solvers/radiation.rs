use std::ops::Range;
use crate::boundary::SimulationMetadata;
use crate::config::NewtonConfig;
use crate::error::Error;
use crate::index_space::IndexSpace;
use crate::integrator::HyperbolicSystem;
use crate::patch::{DirectionalView, Patch};
use crate::radiation::closure::reduced_flux_magnitude;
use crate::radiation::coupling::{explicit_source_terms, update_zone};
use crate::radiation::material::Material;
use crate::radiation::riemann::{face_optical_depth, interface_states, riemann_m1};
use crate::radiation::{GAS_DENSITY, GAS_ENERGY, NUM_COMPONENTS, RAD_ENERGY, X1_GAS_MOMENTUM, X1_RAD_FLUX};




/**
 * The M1 radiation moment equations on the 9-component radiation
 * hydrodynamics state. Transport acts on `(E, Fx, Fy, Fz)`; the gas
 * components enter through the optical depth of each face and through the
 * implicit source terms.
 */
pub struct RadiationSystem<M> {
    pub material: M,
    pub newton: NewtonConfig,
}




// ============================================================================
impl<M: Material> RadiationSystem<M> {

    pub fn new(material: M, newton: NewtonConfig) -> Self {
        Self { material, newton }
    }

    /**
     * Optical depth `dx rho kappa` of one zone, with the opacity evaluated at
     * the gas temperature.
     */
    pub fn cell_optical_depth(&self, cons: &[f64], dx: f64) -> f64 {
        let rho = cons[GAS_DENSITY];
        let p = &cons[X1_GAS_MOMENTUM..X1_GAS_MOMENTUM + 3];
        let eint = cons[GAS_ENERGY] - (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]) / (2.0 * rho);
        let tgas = self.material.tgas_from_egas(rho, eint);
        dx * rho * self.material.opacity(rho, tgas)
    }

    /**
     * Apply the implicit radiation-matter coupling to every zone of `cells`.
     * The optional `advection` patch holds four cached transport fluxes per
     * zone (energy, then the three flux components), which are added to the
     * sources scaled by `dt`.
     */
    pub fn add_source_terms_with(
        &self,
        state: &mut Patch,
        advection: Option<&Patch>,
        cells: &IndexSpace,
        dt: f64,
        metadata: &SimulationMetadata) -> Result<(), Error>
    {
        let material = &self.material;
        let newton = &self.newton;

        state.par_try_for_each_mut_in(cells, |index, cons| {
            let cached = match advection {
                Some(a) => {
                    let a = a.get_slice(index);
                    [a[0], a[1], a[2], a[3]]
                }
                None => [0.0; 4],
            };
            update_zone(material, cons, material.rad_energy_source(index, metadata), cached, dt, newton, index)
        })
    }

    /**
     * Explicit source terms over `cells`, four per zone: the radiation energy
     * term and the three flux damping terms. The state is not modified.
     */
    pub fn compute_source_terms_explicit(
        &self,
        state: &Patch,
        cells: &IndexSpace,
        dt: f64,
        metadata: &SimulationMetadata) -> Patch
    {
        let material = &self.material;
        let mut src = Patch::zeros(4, cells.clone());

        src.par_for_each_mut(|index, s| {
            let source = material.rad_energy_source(index, metadata);
            s.copy_from_slice(&explicit_source_terms(material, state.get_slice(index), source, dt))
        });
        src
    }
}




// ============================================================================
impl<M: Material> HyperbolicSystem for RadiationSystem<M> {

    fn num_components(&self) -> usize {
        NUM_COMPONENTS
    }

    fn hyperbolic_range(&self) -> Range<usize> {
        RAD_ENERGY..NUM_COMPONENTS
    }

    /**
     * Primitive variables are the energy density and the reduced flux `F /
     * (c E)`.
     */
    fn conserved_to_primitive(&self, index: (i64, i64, i64), cons: &[f64], prim: &mut [f64]) -> Result<(), Error> {
        let c = self.material.constants().c_light;
        let erad = cons[RAD_ENERGY];

        if !(erad > 0.0) {
            return Err(Error::NonPositiveRadiationEnergy { index, erad })
        }
        prim[0] = erad;

        for n in 0..3 {
            prim[1 + n] = cons[X1_RAD_FLUX + n] / (c * erad)
        }
        Ok(())
    }

    fn riemann(
        &self,
        cons: &DirectionalView,
        face: (i64, i64, i64),
        left: &[f64],
        right: &[f64],
        dx: f64,
        flux: &mut [f64],
        diffusive: &mut [f64])
    {
        let constants = self.material.constants();
        let cl = cons.offset(face, -1);
        let cr = cons.offset(face, 0);

        let (ul, ur) = interface_states(left, right, &cl[RAD_ENERGY..], &cr[RAD_ENERGY..], constants.c_light);
        let tau = face_optical_depth(self.cell_optical_depth(cl, dx), self.cell_optical_depth(cr, dx));
        let (f, d) = riemann_m1(ul, ur, cons.axis(), tau, constants);

        f.write_to_slice(flux);
        d.write_to_slice(diffusive);
    }

    fn is_state_valid(&self, cons: &[f64]) -> bool {
        let c = self.material.constants().c_light;
        let erad = cons[RAD_ENERGY];
        let f = reduced_flux_magnitude([cons[X1_RAD_FLUX], cons[X1_RAD_FLUX + 1], cons[X1_RAD_FLUX + 2]]) / (c * erad);
        erad > 0.0 && f <= 1.0
    }

    fn max_signal_speed(&self, _cons: &[f64]) -> f64 {
        self.material.constants().c_hat
    }

    fn enforce_limits(&self, cons: &mut [f64]) {
        let floor = self.material.constants().erad_floor;

        if cons[RAD_ENERGY] < floor {
            cons[RAD_ENERGY] = floor
        }
    }

    fn add_source_terms(&self, state: &mut Patch, cells: &IndexSpace, dt: f64, metadata: &SimulationMetadata) -> Result<(), Error> {
        self.add_source_terms_with(state, None, cells, dt, metadata)
    }
}
