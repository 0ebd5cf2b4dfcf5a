use rayon::prelude::*;
use crate::index_space::{Axis, IndexSpace};




/**
 * A patch is a mapping from a rectangular subset of a 3D index space to
 * associated field values. The mapping is backed by a row-major array of data,
 * where each zone holds `num_fields` contiguous components; it is addressed as
 * `(i, j, k, component)`. Patches are allocated by the caller, usually over an
 * index space padded with guard zones, and the numerical kernels read and
 * write through them without allocating storage of their own.
 */
#[derive(Clone, Debug, serde::Serialize)]
pub struct Patch {
    space: IndexSpace,
    num_fields: usize,
    data: Vec<f64>,
}




// ============================================================================
impl Patch {


    /**
     * Generate a patch of zeros over the given index space.
     */
    pub fn zeros(num_fields: usize, space: IndexSpace) -> Self {
        Self {
            data: vec![0.0; space.len() * num_fields],
            space,
            num_fields,
        }
    }


    /**
     * Generate a patch covering the given index space, with values defined
     * from a closure which writes each zone's components into a slice.
     */
    pub fn from_slice_function<F>(space: IndexSpace, num_fields: usize, f: F) -> Self
    where
        F: Fn((i64, i64, i64), &mut [f64])
    {
        let mut data = vec![0.0; space.len() * num_fields];

        for (index, slice) in space.iter().zip(data.chunks_exact_mut(num_fields)) {
            f(index, slice)
        }
        Self { space, num_fields, data }
    }


    /**
     * Return the index space covered by this patch.
     */
    pub fn index_space(&self) -> &IndexSpace {
        &self.space
    }


    /**
     * Return the number of fields stored per zone.
     */
    pub fn num_fields(&self) -> usize {
        self.num_fields
    }


    /**
     * Return the backing data, row-major with contiguous field components.
     */
    pub fn data(&self) -> &[f64] {
        &self.data
    }


    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }


    /**
     * Return a single field value at the given index.
     */
    pub fn get(&self, index: (i64, i64, i64), field: usize) -> f64 {
        self.get_slice(index)[field]
    }


    /**
     * Set a single field value at the given index.
     */
    pub fn set(&mut self, index: (i64, i64, i64), field: usize, value: f64) {
        self.get_slice_mut(index)[field] = value
    }


    /**
     * Return all of the fields at the given index as a slice.
     */
    pub fn get_slice(&self, index: (i64, i64, i64)) -> &[f64] {
        self.validate_index(index);
        let s = self.index_space().row_major_offset(index) * self.num_fields;
        &self.data[s..s + self.num_fields]
    }


    pub fn get_slice_mut(&mut self, index: (i64, i64, i64)) -> &mut [f64] {
        self.validate_index(index);
        let s = self.index_space().row_major_offset(index) * self.num_fields;
        let n = self.num_fields;
        &mut self.data[s..s + n]
    }


    /**
     * Return a view of this patch which addresses zones by their logical
     * position along a sweep direction.
     */
    pub fn along(&self, axis: Axis) -> DirectionalView<'_> {
        DirectionalView { patch: self, axis }
    }


    /**
     * Copy the values of every zone in `space` from another patch, which
     * must contain that space and have the same number of fields.
     */
    pub fn copy_region_from(&mut self, other: &Patch, space: &IndexSpace) {
        assert_eq!(self.num_fields, other.num_fields, "patches have different field counts");

        for index in space.iter() {
            self.get_slice_mut(index).copy_from_slice(other.get_slice(index))
        }
    }


    /**
     * Copy all of the fields of one zone onto another zone of this patch.
     */
    pub fn copy_zone(&mut self, from: (i64, i64, i64), to: (i64, i64, i64)) {
        self.validate_index(from);
        self.validate_index(to);
        let n = self.num_fields;
        let s = self.space.row_major_offset(from) * n;
        let d = self.space.row_major_offset(to) * n;
        self.data.copy_within(s..s + n, d)
    }


    /**
     * Run a closure on each zone of this patch in parallel. The closure
     * receives the zone index and a mutable slice of its fields; no zone is
     * visited twice.
     */
    pub fn par_for_each_mut<F>(&mut self, f: F)
    where
        F: Fn((i64, i64, i64), &mut [f64]) + Sync + Send
    {
        let space = self.index_space().clone();
        let n = self.num_fields;

        self.data
            .par_chunks_exact_mut(n)
            .enumerate()
            .for_each(|(offset, slice)| f(space.index_at_offset(offset), slice))
    }


    /**
     * Run a fallible closure in parallel on each zone of this patch that lies
     * within `space`. Returns the first error encountered, if any.
     */
    pub fn par_try_for_each_mut_in<F, E>(&mut self, space: &IndexSpace, f: F) -> Result<(), E>
    where
        F: Fn((i64, i64, i64), &mut [f64]) -> Result<(), E> + Sync + Send,
        E: Send,
    {
        let patch_space = self.index_space().clone();
        let n = self.num_fields;

        assert!(patch_space.contains_space(space), "subspace is not contained in the patch");

        self.data
            .par_chunks_exact_mut(n)
            .enumerate()
            .map(|(offset, slice)| (patch_space.index_at_offset(offset), slice))
            .filter(|(index, _)| space.contains(*index))
            .try_for_each(|(index, slice)| f(index, slice))
    }


    fn validate_index(&self, index: (i64, i64, i64)) {
        let space = self.index_space();
        if !space.contains(index) {
            let (i0, j0, k0) = space.start();
            let (i1, j1, k1) = space.end();
            panic!("index ({} {} {}) out of range on patch ({}..{} {}..{} {}..{})",
                index.0,
                index.1,
                index.2,
                i0, i1,
                j0, j1,
                k0, k1);
        }
    }
}




/**
 * A thin adapter over a patch that addresses zones relative to a sweep
 * direction. Flux and reconstruction kernels are written once in terms of the
 * normal offset, and the view maps it to the physical storage layout.
 */
#[derive(Clone, Copy)]
pub struct DirectionalView<'a> {
    patch: &'a Patch,
    axis: Axis,
}




// ============================================================================
impl<'a> DirectionalView<'a> {

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /**
     * Return the fields of the zone at logical position `(normal, tangent1,
     * tangent2)`.
     */
    pub fn logical(&self, logical: (i64, i64, i64)) -> &'a [f64] {
        self.patch.get_slice(self.axis.to_physical(logical))
    }

    /**
     * Return the fields of the zone offset by `delta` along the sweep
     * direction from the physical index `index`.
     */
    pub fn offset(&self, index: (i64, i64, i64), delta: i64) -> &'a [f64] {
        let (n, t1, t2) = self.axis.to_logical(index);
        self.logical((n + delta, t1, t2))
    }

    /**
     * Return one field of the zone offset by `delta` along the sweep
     * direction.
     */
    pub fn get(&self, index: (i64, i64, i64), delta: i64, field: usize) -> f64 {
        self.offset(index, delta)[field]
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::Patch;
    use crate::index_space::{range1d, range3d, Axis};

    #[test]
    fn patch_addressing_works() {
        let patch = Patch::from_slice_function(range3d(4..10, 4..10, 0..2), 2, |(i, j, k), s| {
            s[0] = (i + j) as f64;
            s[1] = k as f64;
        });
        assert_eq!(patch.get((5, 5, 0), 0), 10.0);
        assert_eq!(patch.get((6, 8, 1), 0), 14.0);
        assert_eq!(patch.get((6, 8, 1), 1), 1.0);
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_panics() {
        let patch = Patch::zeros(1, range1d(0..4));
        patch.get((4, 0, 0), 0);
    }

    #[test]
    fn directional_view_offsets_along_the_sweep_axis() {
        let patch = Patch::from_slice_function(range3d(0..3, 0..3, 0..3), 1, |(i, j, k), s| {
            s[0] = (100 * i + 10 * j + k) as f64;
        });
        assert_eq!(patch.along(Axis::I).get((1, 1, 1), -1, 0), 11.0);
        assert_eq!(patch.along(Axis::J).get((1, 1, 1), 1, 0), 121.0);
        assert_eq!(patch.along(Axis::K).get((1, 1, 1), 1, 0), 112.0);
    }

    #[test]
    fn parallel_visit_touches_every_zone_in_subspace() {
        let mut patch = Patch::zeros(2, range3d(0..6, 0..5, 0..1));
        let inner = range3d(1..5, 1..4, 0..1);
        patch
            .par_try_for_each_mut_in(&inner, |_, s| -> Result<(), ()> {
                s[1] = 1.0;
                Ok(())
            })
            .unwrap();
        let total: f64 = patch.data().iter().sum();
        assert_eq!(total, inner.len() as f64);

        patch.par_for_each_mut(|(i, _, _), s| s[0] = i as f64);
        assert_eq!(patch.get((5, 2, 0), 0), 5.0);
    }

    #[test]
    fn copy_region_leaves_other_zones_alone() {
        let source = Patch::from_slice_function(range1d(0..8), 1, |_, s| s[0] = 1.0);
        let mut target = Patch::zeros(1, range1d(0..8));
        target.copy_region_from(&source, &range1d(2..5));
        assert_eq!(target.data().iter().sum::<f64>(), 3.0);
    }
}
