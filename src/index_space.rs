use core::ops::Range;




/**
 * Identifier for a Cartesian axis. In a directional sweep, the axis is the
 * face-normal direction.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Axis {
    I,
    J,
    K,
}




// ============================================================================
impl Axis {

    pub const ALL: [Axis; 3] = [Axis::I, Axis::J, Axis::K];


    /**
     * Return the numeric position (0, 1, or 2) of this axis.
     */
    pub fn index(self) -> usize {
        match self {
            Axis::I => 0,
            Axis::J => 1,
            Axis::K => 2,
        }
    }


    /**
     * Return the given index, translated by `delta` elements along this axis.
     */
    pub fn shift(self, index: (i64, i64, i64), delta: i64) -> (i64, i64, i64) {
        let (i, j, k) = index;
        match self {
            Axis::I => (i + delta, j, k),
            Axis::J => (i, j + delta, k),
            Axis::K => (i, j, k + delta),
        }
    }


    /**
     * Map a physical `(i, j, k)` index to the logical `(normal, tangent1,
     * tangent2)` ordering of a sweep along this axis. The orderings are
     * X1 -> (i, j, k), X2 -> (j, k, i), X3 -> (k, i, j).
     */
    pub fn to_logical(self, index: (i64, i64, i64)) -> (i64, i64, i64) {
        let (i, j, k) = index;
        match self {
            Axis::I => (i, j, k),
            Axis::J => (j, k, i),
            Axis::K => (k, i, j),
        }
    }


    /**
     * Inverse of `to_logical`.
     */
    pub fn to_physical(self, logical: (i64, i64, i64)) -> (i64, i64, i64) {
        let (n, t1, t2) = logical;
        match self {
            Axis::I => (n, t1, t2),
            Axis::J => (t2, n, t1),
            Axis::K => (t1, t2, n),
        }
    }
}




#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]


/**
 * Represents a rectangular region in a discrete 3D index space
 */
pub struct IndexSpace {
    di: Range<i64>,
    dj: Range<i64>,
    dk: Range<i64>,
}




/**
 * Describes a rectangular index space. The index type is signed 64-bit
 * integer. Lower-dimensional problems use a single-element range on the unused
 * axes.
 */
impl IndexSpace {


    pub fn new(di: Range<i64>, dj: Range<i64>, dk: Range<i64>) -> Self {

        assert!(
            di.start <= di.end && dj.start <= dj.end && dk.start <= dk.end,
            "index space has negative volume");

        Self { di, dj, dk }
    }


    /**
     * Return the number of indexes on each axis.
     */
    pub fn dim(&self) -> (usize, usize, usize) {
        ((self.di.end - self.di.start) as usize,
         (self.dj.end - self.dj.start) as usize,
         (self.dk.end - self.dk.start) as usize)
    }


    /**
     * Return the number of elements in this index space.
     */
    pub fn len(&self) -> usize {
        let (l, m, n) = self.dim();
        l * m * n
    }


    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /**
     * Return the minimum index (inclusive).
     */
    pub fn start(&self) -> (i64, i64, i64) {
        (self.di.start, self.dj.start, self.dk.start)
    }


    /**
     * Return the maximum index (exclusive).
     */
    pub fn end(&self) -> (i64, i64, i64) {
        (self.di.end, self.dj.end, self.dk.end)
    }


    /**
     * Return the range of indexes covered on the given axis.
     */
    pub fn range(&self, axis: Axis) -> Range<i64> {
        match axis {
            Axis::I => self.di.clone(),
            Axis::J => self.dj.clone(),
            Axis::K => self.dk.clone(),
        }
    }


    /**
     * Determine whether this index space contains the given index.
     */
    pub fn contains(&self, index: (i64, i64, i64)) -> bool {
        self.di.contains(&index.0) && self.dj.contains(&index.1) && self.dk.contains(&index.2)
    }


    /**
     * Determine whether another index space is a subset of this one.
     */
    pub fn contains_space(&self, other: &Self) -> bool {
        other.di.start >= self.di.start && other.di.end <= self.di.end &&
        other.dj.start >= self.dj.start && other.dj.end <= self.dj.end &&
        other.dk.start >= self.dk.start && other.dk.end <= self.dk.end
    }


    /**
     * Return a copy of this index space with the range on one axis replaced.
     */
    pub fn with_range(&self, axis: Axis, range: Range<i64>) -> Self {
        let mut result = self.clone();
        match axis {
            Axis::I => result.di = range,
            Axis::J => result.dj = range,
            Axis::K => result.dk = range,
        }
        assert!(result.di.start <= result.di.end && result.dj.start <= result.dj.end && result.dk.start <= result.dk.end,
            "index space has negative volume");
        result
    }


    /**
     * Expand this index space by the given number of elements on both sides
     * of a single axis.
     */
    pub fn extend(&self, delta: i64, axis: Axis) -> Self {
        let r = self.range(axis);
        self.with_range(axis, r.start - delta .. r.end + delta)
    }


    /**
     * Expand this index space by the given number of elements on each axis.
     */
    pub fn extend_all(&self, delta: i64) -> Self {
        self.extend(delta, Axis::I).extend(delta, Axis::J).extend(delta, Axis::K)
    }


    /**
     * Extend just the upper elements of this index space on the given axis.
     * With `delta = 1` this converts a range of cells into the range of faces
     * surrounding them along the axis.
     */
    pub fn extend_upper(&self, delta: i64, axis: Axis) -> Self {
        let r = self.range(axis);
        self.with_range(axis, r.start .. r.end + delta)
    }


    /**
     * Trim this index space by the given number of elements on each axis.
     */
    pub fn trim_all(&self, delta: i64) -> Self {
        self.extend_all(-delta)
    }


    /**
     * Trim just the lower elements of this index space by a certain amount on
     * the given axis.
     */
    pub fn trim_lower(&self, delta: i64, axis: Axis) -> Self {
        let r = self.range(axis);
        self.with_range(axis, r.start + delta .. r.end)
    }


    /**
     * Translate this index space by the given number of elements along an
     * axis.
     */
    pub fn translate(&self, delta: i64, axis: Axis) -> Self {
        let r = self.range(axis);
        self.with_range(axis, r.start + delta .. r.end + delta)
    }


    /**
     * Return the linear offset for the given index, in a row-major memory
     * buffer aligned with the start of this index space.
     */
    pub fn row_major_offset(&self, index: (i64, i64, i64)) -> usize {
        let (_, m, n) = self.dim();
        let i = (index.0 - self.di.start) as usize;
        let j = (index.1 - self.dj.start) as usize;
        let k = (index.2 - self.dk.start) as usize;
        (i * m + j) * n + k
    }


    /**
     * Inverse of `row_major_offset`.
     */
    pub fn index_at_offset(&self, offset: usize) -> (i64, i64, i64) {
        let (_, m, n) = self.dim();
        let k = offset % n;
        let j = (offset / n) % m;
        let i = offset / (n * m);
        (self.di.start + i as i64, self.dj.start + j as i64, self.dk.start + k as i64)
    }


    /**
     * Return an iterator which traverses the index space in row-major order
     * (C-like; the final index increases fastest).
     */
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64, i64)> + '_ {
        self.di.clone().flat_map(move |i| {
            self.dj.clone().flat_map(move |j| self.dk.clone().map(move |k| (i, j, k)))
        })
    }
}




// ============================================================================
impl From<(Range<i64>, Range<i64>, Range<i64>)> for IndexSpace {
    fn from(range: (Range<i64>, Range<i64>, Range<i64>)) -> Self {
        Self::new(range.0, range.1, range.2)
    }
}

impl From<IndexSpace> for (Range<i64>, Range<i64>, Range<i64>) {
    fn from(space: IndexSpace) -> Self {
        (space.di, space.dj, space.dk)
    }
}




/**
 * Less imposing factory function to construct an IndexSpace object.
 */
pub fn range3d(di: Range<i64>, dj: Range<i64>, dk: Range<i64>) -> IndexSpace {
    IndexSpace::new(di, dj, dk)
}




/**
 * Construct a one-dimensional index space (the unused axes span one element).
 */
pub fn range1d(di: Range<i64>) -> IndexSpace {
    IndexSpace::new(di, 0..1, 0..1)
}
