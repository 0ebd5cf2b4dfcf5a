use criterion::{black_box, criterion_group, criterion_main, Criterion};
use radhydro::index_space::{range3d, Axis};
use radhydro::patch::Patch;

const NI: i64 = 100;
const NJ: i64 = 100;
const NK: i64 = 100;
const NUM_FIELDS: usize = 9;




// ============================================================================
fn traversal_with_linear_iteration(c: &mut Criterion) {
    let data = vec![1.0; (NI * NJ * NK) as usize * NUM_FIELDS];

    c.bench_function("traversal_with_linear_iteration", |b| b.iter(|| {
        let mut total = [0.0; NUM_FIELDS];
        for x in black_box(&data).chunks_exact(NUM_FIELDS) {
            for s in 0..NUM_FIELDS {
                total[s] += x[s]
            }
        }
        assert_eq!(total[0], (NI * NJ * NK) as f64);
    }));
}




// ============================================================================
fn traversal_with_index_space_iter(c: &mut Criterion) {
    let patch = Patch::from_slice_function(range3d(0..NI, 0..NJ, 0..NK), NUM_FIELDS, |_, s| s.fill(1.0));

    c.bench_function("traversal_with_index_space_iter", |b| b.iter(|| {
        let mut total = [0.0; NUM_FIELDS];
        for index in patch.index_space().iter() {
            for (t, x) in total.iter_mut().zip(black_box(&patch).get_slice(index)) {
                *t += x
            }
        }
        assert_eq!(total[0], (NI * NJ * NK) as f64);
    }));
}




// ============================================================================
fn traversal_with_directional_view(c: &mut Criterion) {
    let patch = Patch::from_slice_function(range3d(-1..NI + 1, 0..NJ, 0..NK), NUM_FIELDS, |_, s| s.fill(1.0));
    let interior = range3d(0..NI, 0..NJ, 0..NK);

    c.bench_function("traversal_with_directional_view", |b| b.iter(|| {
        let view = black_box(&patch).along(Axis::I);
        let mut total = 0.0;
        for index in interior.iter() {
            total += view.get(index, 1, 0) - view.get(index, -1, 0)
        }
        assert_eq!(total, 0.0);
    }));
}




// ============================================================================
fn parallel_zone_update(c: &mut Criterion) {
    let mut patch = Patch::zeros(NUM_FIELDS, range3d(0..NI, 0..NJ, 0..NK));

    c.bench_function("parallel_zone_update", |b| b.iter(|| {
        patch.par_for_each_mut(|index, s| s[0] = (index.0 + index.1 + index.2) as f64)
    }));
}

criterion_group!(
    benches,
    traversal_with_linear_iteration,
    traversal_with_index_space_iter,
    traversal_with_directional_view,
    parallel_zone_update);
criterion_main!(benches);
