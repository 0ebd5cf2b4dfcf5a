use serde::{Serialize, Deserialize};
use crate::index_space::{Axis, IndexSpace};




/// A simple rectilinear structured mesh. Only the first `dimensionality` axes
/// are evolved; the remaining axes hold a single zone and carry no guard
/// zones or fluxes.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mesh {
    pub lower: (f64, f64, f64),
    pub upper: (f64, f64, f64),
    pub size: (i64, i64, i64),
    pub dimensionality: usize,
}

impl Mesh {

    /// A one-dimensional mesh of `nx` zones spanning `[x0, x1]`. The unused
    /// axes have unit width.
    ///
    pub fn line(x0: f64, x1: f64, nx: i64) -> Self {
        Self {
            lower: (x0, 0.0, 0.0),
            upper: (x1, 1.0, 1.0),
            size: (nx, 1, 1),
            dimensionality: 1,
        }
    }

    pub fn is_active(&self, axis: Axis) -> bool {
        axis.index() < self.dimensionality
    }

    pub fn active_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.iter().copied().filter(move |a| self.is_active(*a))
    }

    pub fn cell_spacing(&self, axis: Axis) -> f64 {
        match axis {
            Axis::I => (self.upper.0 - self.lower.0) / self.size.0 as f64,
            Axis::J => (self.upper.1 - self.lower.1) / self.size.1 as f64,
            Axis::K => (self.upper.2 - self.lower.2) / self.size.2 as f64,
        }
    }

    pub fn smallest_spacing(&self) -> f64 {
        self.active_axes().map(|a| self.cell_spacing(a)).fold(f64::INFINITY, f64::min)
    }

    pub fn cell_center(&self, index: (i64, i64, i64)) -> (f64, f64, f64) {
        let x = self.lower.0 + self.cell_spacing(Axis::I) * (index.0 as f64 + 0.5);
        let y = self.lower.1 + self.cell_spacing(Axis::J) * (index.1 as f64 + 0.5);
        let z = self.lower.2 + self.cell_spacing(Axis::K) * (index.2 as f64 + 0.5);
        (x, y, z)
    }

    /// The index space of the interior (valid) zones.
    ///
    pub fn index_space(&self) -> IndexSpace {
        IndexSpace::new(0..self.size.0, 0..self.size.1, 0..self.size.2)
    }

    /// The given index space, grown by `num_guard` zones along each active
    /// axis.
    ///
    pub fn grow(&self, space: &IndexSpace, num_guard: i64) -> IndexSpace {
        self.active_axes().fold(space.clone(), |s, a| s.extend(num_guard, a))
    }

    pub fn total_zones(&self) -> i64 {
        self.size.0 * self.size.1 * self.size.2
    }

    pub fn validate(&self) -> Result<(), crate::Error> {
        let sizes = [self.size.0, self.size.1, self.size.2];
        let widths = [self.upper.0 - self.lower.0, self.upper.1 - self.lower.1, self.upper.2 - self.lower.2];

        if !(1..=3).contains(&self.dimensionality) {
            return Err(crate::Error::InvalidConfig(format!("dimensionality must be 1, 2, or 3, got {}", self.dimensionality)))
        }
        if sizes.iter().any(|n| *n < 1) || widths.iter().any(|w| !(*w > 0.0)) {
            return Err(crate::Error::InvalidConfig("mesh must have positive zone counts and extent".into()))
        }
        Ok(())
    }
}
