/**
 * Magnitude of the reduced flux vector `f = F / (c E)`.
 */
pub fn reduced_flux_magnitude(f: [f64; 3]) -> f64 {
    (f[0] * f[0] + f[1] * f[1] + f[2] * f[2]).sqrt()
}




/**
 * Levermore (1984) M1 closure, Eq. 25. The argument is clamped to [0, 1],
 * and the result lies in [1/3, 1]: 1/3 for isotropic radiation and 1 in the
 * free-streaming limit.
 */
pub fn eddington_factor(f: f64) -> f64 {
    let f = f.clamp(0.0, 1.0);
    let f_fac = (4.0 - 3.0 * (f * f)).sqrt();
    (3.0 + 4.0 * (f * f)) / (5.0 + 2.0 * f_fac)
}




/**
 * The Eddington tensor `T_ij = (1 - chi)/2 delta_ij + (3 chi - 1)/2 n_i n_j`
 * for the given reduced flux, where `n` is the unit vector along the flux.
 * When the flux vanishes the direction is undefined, and the anisotropic
 * term is dropped. The radiation pressure tensor is `T E`.
 */
pub fn eddington_tensor(reduced_flux: [f64; 3]) -> [[f64; 3]; 3] {
    let f = reduced_flux_magnitude(reduced_flux);
    let chi = eddington_factor(f);

    debug_assert!((1.0 / 3.0..=1.0).contains(&chi));

    let t_diag = (1.0 - chi) / 2.0;
    let t_f = (3.0 * chi - 1.0) / 2.0;
    let mut n = [0.0; 3];

    if f > 0.0 {
        for (n, fi) in n.iter_mut().zip(reduced_flux.iter()) {
            *n = fi / f
        }
    }
    let mut t = [[0.0; 3]; 3];

    for i in 0..3 {
        for j in 0..3 {
            let delta_ij = if i == j { 1.0 } else { 0.0 };
            t[i][j] = t_diag * delta_ij + t_f * (n[i] * n[j]);
        }
    }
    t
}
