use crate::config::RadiationConstants;
use crate::index_space::Axis;
use crate::num_vec::Vector;
use super::closure::{eddington_tensor, reduced_flux_magnitude};




/// Conserved radiation variables `(E, Fx, Fy, Fz)`, or their fluxes.
pub type RadVector = Vector<f64, 4>;




/**
 * Pick the left and right conserved states at a face. The reconstructed
 * primitives `(E, fx, fy, fz)` are used when both are physical, meaning a
 * positive energy density and a reduced flux below 1. Otherwise the face
 * falls back to the cell-centered conserved states of the two adjacent
 * zones (piecewise-constant reconstruction).
 */
pub fn interface_states(
    prim_l: &[f64],
    prim_r: &[f64],
    cons_l: &[f64],
    cons_r: &[f64],
    c_light: f64) -> (RadVector, RadVector)
{
    let e_l = prim_l[0];
    let e_r = prim_r[0];
    let f_l = reduced_flux_magnitude([prim_l[1], prim_l[2], prim_l[3]]);
    let f_r = reduced_flux_magnitude([prim_r[1], prim_r[2], prim_r[3]]);

    if (e_l > 0.0) && (e_r > 0.0) && (f_l < 1.0) && (f_r < 1.0) {
        let u = |e: f64, p: &[f64]| RadVector::new([e, p[1] * c_light * e, p[2] * c_light * e, p[3] * c_light * e]);
        (u(e_l, prim_l), u(e_r, prim_r))
    } else {
        (RadVector::from_slice(cons_l), RadVector::from_slice(cons_r))
    }
}




/**
 * Harmonic mean of the optical depths of the two zones adjacent to a face.
 * Two transparent zones give zero.
 */
pub fn face_optical_depth(tau_l: f64, tau_r: f64) -> f64 {
    if tau_l + tau_r > 0.0 {
        (2.0 * tau_l * tau_r) / (tau_l + tau_r)
    } else {
        0.0
    }
}




/**
 * Physical flux along `axis` of one side of the face in the frozen Eddington
 * tensor approximation (Balsara 1999, Eq. 46), together with the normal
 * component of the Eddington tensor.
 */
fn side_flux(u: RadVector, axis: Axis, constants: &RadiationConstants) -> (RadVector, f64) {
    let c = constants.c_light;
    let chat = constants.c_hat;
    let e = u[0];
    let t = eddington_tensor([u[1] / (c * e), u[2] / (c * e), u[3] / (c * e)]);
    let n = axis.index();

    let f_n = u[1 + n];
    let p_n = [t[n][0] * e, t[n][1] * e, t[n][2] * e];

    debug_assert!(f_n.is_finite() && p_n.iter().all(|p| p.is_finite()));

    let flux = RadVector::new([
        (chat / c) * f_n,
        (chat * c) * p_n[0],
        (chat * c) * p_n[1],
        (chat * c) * p_n[2],
    ]);
    (flux, t[n][n])
}




/**
 * HLL flux of the M1 radiation moment system at a face, following Toro
 * (1998) and Balsara (2017), with eigenvalue estimates after Skinner &
 * Ostriker (2013).
 *
 * Returns the asymptotic-preserving flux and the undamped (diffusive) HLL
 * flux. The dissipative term of the former is scaled component-wise by
 * `(S^2, S, S, S)`, with `S = min(1, 1/tau)` and `tau` the face optical
 * depth, so the energy flux takes the correct diffusion limit in optically
 * thick regions.
 */
pub fn riemann_m1(
    ul: RadVector,
    ur: RadVector,
    axis: Axis,
    tau: f64,
    constants: &RadiationConstants) -> (RadVector, RadVector)
{
    let chat = constants.c_hat;

    debug_assert!(ul[0] > 0.0 && ur[0] > 0.0);

    let (fl, t_normal_l) = side_flux(ul, axis, constants);
    let (fr, t_normal_r) = side_flux(ur, axis, constants);

    let s_corr = f64::min(1.0, 1.0 / tau);
    let epsilon = RadVector::new([s_corr * s_corr, s_corr, s_corr, s_corr]);

    let s_l = f64::min(-0.1 * chat, -chat * t_normal_l.sqrt());
    let s_r = f64::max(0.1 * chat, chat * t_normal_r.sqrt());

    debug_assert!(s_l.abs() <= chat && s_r.abs() <= chat);

    let average = fl * (s_r / (s_r - s_l)) - fr * (s_l / (s_r - s_l));
    let dissipation = (ur - ul) * (s_r * s_l / (s_r - s_l));

    let flux = average + epsilon.hadamard(dissipation);
    let diffusive = average + dissipation;

    debug_assert!(flux.iter().all(|x| !x.is_nan()));

    (flux, diffusive)
}
