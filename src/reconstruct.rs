use serde::{Serialize, Deserialize};
use crate::index_space::Axis;
use crate::limiter::{mc, min_max3};
use crate::patch::{DirectionalView, Patch};




/**
 * Order of the interface reconstruction
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reconstruction {
    /// Piecewise constant (first order)
    Constant,
    /// Piecewise linear with the MC limiter (second order, TVD)
    Linear,
    /// Piecewise parabolic, Colella & Woodward (1984)
    Parabolic,
}




// ============================================================================
impl Reconstruction {

    /**
     * Number of guard zones that must hold valid data outside the updated
     * cells. The parabolic figure includes the stencil of the hydro shock
     * flattening coefficients.
     */
    pub fn required_guard(self) -> i64 {
        match self {
            Reconstruction::Constant => 1,
            Reconstruction::Linear => 2,
            Reconstruction::Parabolic => 4,
        }
    }
}




/**
 * Fill the interface states `left` and `right` from the cell-centered
 * variables `q`. The two output patches must cover the same index space of
 * faces, and face `i` is the left edge of cell `i`: `left(i)` approaches the
 * face from cell `i - 1`, and `right(i)` from cell `i`. The patch `q` must
 * extend `method.required_guard()` zones (less one for the flattening
 * stencil) past the faces along `axis`; violating this panics.
 */
pub fn reconstruct(method: Reconstruction, q: &Patch, axis: Axis, left: &mut Patch, right: &mut Patch) {
    assert_eq!(left.index_space(), right.index_space(), "left and right states must cover the same faces");

    let view = q.along(axis);
    let nq = q.num_fields();

    left.par_for_each_mut(|face, l| {
        for (n, x) in l.iter_mut().enumerate().take(nq) {
            *x = left_state(method, &view, face, n)
        }
    });
    right.par_for_each_mut(|face, r| {
        for (n, x) in r.iter_mut().enumerate().take(nq) {
            *x = right_state(method, &view, face, n)
        }
    });
}




/**
 * Blend the interface states toward the cell averages, `a <- chi a + (1 -
 * chi) q`, where `chi` is a one-field patch of per-cell flattening
 * coefficients in [0, 1]. A coefficient of 1 leaves the reconstruction
 * unchanged and 0 reduces it to first order.
 */
pub fn flatten(q: &Patch, chi: &Patch, axis: Axis, left: &mut Patch, right: &mut Patch) {
    let qv = q.along(axis);
    let cv = chi.along(axis);

    left.par_for_each_mut(|face, l| {
        let c = cv.get(face, -1, 0);
        let q = qv.offset(face, -1);
        for (a, q) in l.iter_mut().zip(q) {
            *a = c * *a + (1.0 - c) * q
        }
    });
    right.par_for_each_mut(|face, r| {
        let c = cv.get(face, 0, 0);
        let q = qv.offset(face, 0);
        for (a, q) in r.iter_mut().zip(q) {
            *a = c * *a + (1.0 - c) * q
        }
    });
}




// ============================================================================
fn left_state(method: Reconstruction, q: &DirectionalView, face: (i64, i64, i64), n: usize) -> f64 {
    match method {
        Reconstruction::Constant => q.get(face, -1, n),
        Reconstruction::Linear => {
            let slope = mc(q.get(face, 0, n) - q.get(face, -1, n), q.get(face, -1, n) - q.get(face, -2, n));
            q.get(face, -1, n) + 0.25 * slope
        }
        Reconstruction::Parabolic => ppm_cell(q, face, -1, n).1,
    }
}

fn right_state(method: Reconstruction, q: &DirectionalView, face: (i64, i64, i64), n: usize) -> f64 {
    match method {
        Reconstruction::Constant => q.get(face, 0, n),
        Reconstruction::Linear => {
            let slope = mc(q.get(face, 1, n) - q.get(face, 0, n), q.get(face, 0, n) - q.get(face, -1, n));
            q.get(face, 0, n) - 0.25 * slope
        }
        Reconstruction::Parabolic => ppm_cell(q, face, 0, n).0,
    }
}




/**
 * Fourth-order estimate of the value at the left edge of the cell offset by
 * `d` from `index`, C&W Eq. (1.9). Terms are grouped so the result is exactly
 * symmetric under reflection.
 */
fn ppm_interface(q: &DirectionalView, index: (i64, i64, i64), d: i64, n: usize) -> f64 {
    let c1 = 7.0 / 12.0;
    let c2 = -1.0 / 12.0;
    (c1 * q.get(index, d, n) + c2 * q.get(index, d + 1, n)) + (c1 * q.get(index, d - 1, n) + c2 * q.get(index, d - 2, n))
}




/**
 * Return the limited parabola edge values `(a_minus, a_plus)` of the cell
 * offset by `d` from `index`.
 *
 * At a local extremum the parabola is replaced by the MC-limited linear
 * profile rather than flattened to the cell average. This keeps sawtooth
 * profiles from being clipped, at the price of mild oscillations behind
 * some shocks.
 */
fn ppm_cell(q: &DirectionalView, index: (i64, i64, i64), d: i64, n: usize) -> (f64, f64) {
    let a = q.get(index, d, n);
    let qm = q.get(index, d - 1, n);
    let qp = q.get(index, d + 1, n);
    let (lo, hi) = min_max3(qm, a, qp);

    let a_minus = ppm_interface(q, index, d, n).clamp(lo, hi);
    let a_plus = ppm_interface(q, index, d + 1, n).clamp(lo, hi);

    let dq_minus = a - a_minus;
    let dq_plus = a_plus - a;

    if dq_plus * dq_minus <= 0.0 {
        let dq0 = mc(qp - a, a - qm);
        (a - 0.5 * dq0, a + 0.5 * dq0)
    } else {
        let mut new_a_minus = a_minus;
        let mut new_a_plus = a_plus;

        if dq_minus.abs() >= 2.0 * dq_plus.abs() {
            new_a_minus = a - 2.0 * dq_plus;
        }
        if dq_plus.abs() >= 2.0 * dq_minus.abs() {
            new_a_plus = a + 2.0 * dq_minus;
        }
        (new_a_minus, new_a_plus)
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{flatten, reconstruct, Reconstruction};
    use crate::index_space::{range1d, range3d, Axis};
    use crate::patch::Patch;

    fn states(method: Reconstruction, q: &Patch, faces: std::ops::Range<i64>) -> (Patch, Patch) {
        let mut l = Patch::zeros(q.num_fields(), range1d(faces.clone()));
        let mut r = Patch::zeros(q.num_fields(), range1d(faces));
        reconstruct(method, q, Axis::I, &mut l, &mut r);
        (l, r)
    }

    #[test]
    fn constant_reconstruction_copies_neighbors() {
        let q = Patch::from_slice_function(range1d(-1..5), 1, |(i, _, _), s| s[0] = (i * i) as f64);
        let (l, r) = states(Reconstruction::Constant, &q, 0..5);
        assert_eq!(l.get((3, 0, 0), 0), 4.0);
        assert_eq!(r.get((3, 0, 0), 0), 9.0);
    }

    #[test]
    fn linear_reconstruction_stays_within_local_bounds() {
        let q = Patch::from_slice_function(range1d(-2..12), 1, |(i, _, _), s| {
            s[0] = if i < 5 { 2.0 * i as f64 } else { 10.0 + 0.5 * i as f64 };
        });
        let (l, r) = states(Reconstruction::Linear, &q, 0..11);

        for i in 0..10 {
            let lo = q.get((i - 1, 0, 0), 0).min(q.get((i, 0, 0), 0));
            let hi = q.get((i - 1, 0, 0), 0).max(q.get((i, 0, 0), 0));
            let li = l.get((i, 0, 0), 0);
            let ri = r.get((i, 0, 0), 0);
            assert!(lo <= li && li <= hi);
            assert!(lo <= ri && ri <= hi);
        }
    }

    #[test]
    fn parabolic_reconstruction_is_exact_for_a_cubic() {
        let h = 1.0 / 16.0;
        let x = |i: i64| 1.0 + i as f64 * h;
        let q = Patch::from_slice_function(range1d(-4..20), 1, |(i, _, _), s| {
            let (a, b) = (x(i), x(i + 1));
            s[0] = (b.powi(4) - a.powi(4)) / (4.0 * (b - a));
        });
        let (l, r) = states(Reconstruction::Parabolic, &q, 0..17);

        for i in 0..17 {
            let exact = x(i).powi(3);
            assert!((l.get((i, 0, 0), 0) - exact).abs() < 1e-12);
            assert!((r.get((i, 0, 0), 0) - exact).abs() < 1e-12);
        }
    }

    #[test]
    fn parabolic_reconstruction_is_flat_at_an_isolated_peak() {
        let q = Patch::from_slice_function(range1d(-4..12), 1, |(i, _, _), s| {
            s[0] = if i == 4 { 1.0 } else { 0.0 };
        });
        let (l, r) = states(Reconstruction::Parabolic, &q, 0..9);
        assert_eq!(r.get((4, 0, 0), 0), 1.0);
        assert_eq!(l.get((5, 0, 0), 0), 1.0);

        for i in 0..9 {
            for s in [l.get((i, 0, 0), 0), r.get((i, 0, 0), 0)].iter() {
                assert!(*s >= 0.0 && *s <= 1.0);
            }
        }
    }

    #[test]
    fn uniform_field_reconstructs_to_itself_along_every_axis() {
        let q = Patch::from_slice_function(range3d(-4..8, -4..8, -4..8), 2, |_, s| {
            s[0] = 3.0;
            s[1] = -1.0;
        });
        for axis in Axis::ALL.iter() {
            let faces = range3d(0..4, 0..4, 0..4).extend_upper(1, *axis);
            let mut l = Patch::zeros(2, faces.clone());
            let mut r = Patch::zeros(2, faces);
            reconstruct(Reconstruction::Parabolic, &q, *axis, &mut l, &mut r);
            assert!(l.data().chunks(2).all(|s| s == [3.0, -1.0]));
            assert!(r.data().chunks(2).all(|s| s == [3.0, -1.0]));
        }
    }

    #[test]
    fn zero_flattening_coefficient_gives_first_order_states() {
        let q = Patch::from_slice_function(range1d(-4..12), 1, |(i, _, _), s| s[0] = (i as f64).powi(2));
        let chi = Patch::zeros(1, range1d(-4..12));
        let (mut l, mut r) = states(Reconstruction::Parabolic, &q, 0..9);
        flatten(&q, &chi, Axis::I, &mut l, &mut r);
        assert_eq!(l.get((3, 0, 0), 0), 4.0);
        assert_eq!(r.get((3, 0, 0), 0), 9.0);
    }
}
