use serde::{Serialize, Deserialize};
use crate::index_space::{Axis, IndexSpace};
use crate::mesh::Mesh;
use crate::patch::Patch;




/**
 * Run-time information made available to boundary conditions and source
 * terms: the current time and cycle, and the velocity of the frame the
 * problem is solved in (for problems which follow a moving object).
 */
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulationMetadata {
    pub time: f64,
    pub cycle: u64,
    pub frame_velocity: (f64, f64, f64),
}




/**
 * Rule used to fill the guard zones on one side of the domain
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoundaryCondition {
    /// Copy the nearest interior zone (first-order extrapolation)
    Extrapolate,
    /// Wrap around to the opposite side of the domain
    Periodic,
    /// Mirror the interior, negating the listed components (normally the
    /// momentum and radiation flux normal to the boundary)
    Reflecting { odd_components: Vec<usize> },
    /// Hold every guard zone at the given conserved state
    Fixed(Vec<f64>),
}

impl Default for BoundaryCondition {
    fn default() -> Self {
        BoundaryCondition::Extrapolate
    }
}




/**
 * Something which can fill the guard zones of a patch, given the valid
 * region it surrounds. Implement this to install problem-specific boundary
 * conditions.
 */
pub trait BoundaryFill: Sync {
    fn fill(&self, patch: &mut Patch, valid: &IndexSpace, mesh: &Mesh, metadata: &SimulationMetadata);
}




/**
 * Lower and upper boundary conditions for each axis. Axes are filled in
 * order, and each later axis sweeps across the guard zones of the earlier
 * ones, so the corners are filled as well.
 */
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Boundary {
    pub lower: [BoundaryCondition; 3],
    pub upper: [BoundaryCondition; 3],
}

impl Boundary {

    /// The same condition on every side of the domain.
    pub fn uniform(condition: BoundaryCondition) -> Self {
        Self {
            lower: [condition.clone(), condition.clone(), condition.clone()],
            upper: [condition.clone(), condition.clone(), condition],
        }
    }

    pub fn periodic() -> Self {
        Self::uniform(BoundaryCondition::Periodic)
    }
}

impl BoundaryFill for Boundary {
    fn fill(&self, patch: &mut Patch, valid: &IndexSpace, _mesh: &Mesh, _metadata: &SimulationMetadata) {
        assert!(patch.index_space().contains_space(valid), "valid region is not inside the patch");

        for axis in Axis::ALL.iter().copied() {
            let (lower, upper) = guard_regions(patch.index_space(), valid, axis);
            let start = valid.range(axis).start;
            let end = valid.range(axis).end;

            for index in lower.iter() {
                fill_zone(patch, &self.lower[axis.index()], axis, index, start, end, Side::Lower)
            }
            for index in upper.iter() {
                fill_zone(patch, &self.upper[axis.index()], axis, index, start, end, Side::Upper)
            }
        }
    }
}




/**
 * Boundary condition given by a closure, which is called for every guard
 * zone with the zone index, the mesh, and the simulation metadata. Guard
 * zones are visited in the same axis order as `Boundary`.
 */
pub struct FnBoundary<F>(pub F);

impl<F> BoundaryFill for FnBoundary<F>
where
    F: Fn((i64, i64, i64), &Mesh, &SimulationMetadata, &mut [f64]) + Sync
{
    fn fill(&self, patch: &mut Patch, valid: &IndexSpace, mesh: &Mesh, metadata: &SimulationMetadata) {
        for axis in Axis::ALL.iter().copied() {
            let (lower, upper) = guard_regions(patch.index_space(), valid, axis);

            for index in lower.iter().chain(upper.iter()) {
                (self.0)(index, mesh, metadata, patch.get_slice_mut(index))
            }
        }
    }
}




// ============================================================================
#[derive(Clone, Copy)]
enum Side {
    Lower,
    Upper,
}

fn guard_regions(patch: &IndexSpace, valid: &IndexSpace, axis: Axis) -> (IndexSpace, IndexSpace) {
    let mut region = valid.clone();

    for earlier in Axis::ALL.iter().take(axis.index()) {
        region = region.with_range(*earlier, patch.range(*earlier));
    }
    let p = patch.range(axis);
    let v = valid.range(axis);

    (region.with_range(axis, p.start..v.start), region.with_range(axis, v.end..p.end))
}

fn fill_zone(
    patch: &mut Patch,
    condition: &BoundaryCondition,
    axis: Axis,
    index: (i64, i64, i64),
    start: i64,
    end: i64,
    side: Side)
{
    let (n, t1, t2) = axis.to_logical(index);
    let source = |m: i64| axis.to_physical((m, t1, t2));

    match condition {
        BoundaryCondition::Extrapolate => {
            let m = match side {
                Side::Lower => start,
                Side::Upper => end - 1,
            };
            patch.copy_zone(source(m), index)
        }
        BoundaryCondition::Periodic => {
            let m = start + (n - start).rem_euclid(end - start);
            patch.copy_zone(source(m), index)
        }
        BoundaryCondition::Reflecting { odd_components } => {
            let m = match side {
                Side::Lower => 2 * start - 1 - n,
                Side::Upper => 2 * end - 1 - n,
            };
            patch.copy_zone(source(m), index);

            let slice = patch.get_slice_mut(index);
            for c in odd_components {
                slice[*c] = -slice[*c]
            }
        }
        BoundaryCondition::Fixed(values) => {
            patch.get_slice_mut(index).copy_from_slice(values)
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::index_space::{range1d, range3d};

    fn ramp(space: IndexSpace, valid: &IndexSpace) -> Patch {
        Patch::from_slice_function(space, 2, |index, s| {
            if valid.contains(index) {
                s[0] = index.0 as f64 + 10.0 * index.1 as f64;
                s[1] = 1.0;
            } else {
                s[0] = f64::NAN;
                s[1] = f64::NAN;
            }
        })
    }

    #[test]
    fn extrapolate_copies_edge_zones() {
        let valid = range1d(0..4);
        let mut patch = ramp(valid.extend(2, Axis::I), &valid);
        Boundary::default().fill(&mut patch, &valid, &Mesh::line(0.0, 1.0, 4), &SimulationMetadata::default());
        assert_eq!(patch.get((-2, 0, 0), 0), 0.0);
        assert_eq!(patch.get((5, 0, 0), 0), 3.0);
    }

    #[test]
    fn periodic_wraps_around() {
        let valid = range1d(0..4);
        let mut patch = ramp(valid.extend(2, Axis::I), &valid);
        Boundary::periodic().fill(&mut patch, &valid, &Mesh::line(0.0, 1.0, 4), &SimulationMetadata::default());
        assert_eq!(patch.get((-1, 0, 0), 0), 3.0);
        assert_eq!(patch.get((-2, 0, 0), 0), 2.0);
        assert_eq!(patch.get((4, 0, 0), 0), 0.0);
        assert_eq!(patch.get((5, 0, 0), 0), 1.0);
    }

    #[test]
    fn reflecting_mirrors_and_flips_odd_components() {
        let valid = range1d(0..4);
        let mut patch = ramp(valid.extend(2, Axis::I), &valid);
        let boundary = Boundary::uniform(BoundaryCondition::Reflecting { odd_components: vec![1] });
        boundary.fill(&mut patch, &valid, &Mesh::line(0.0, 1.0, 4), &SimulationMetadata::default());
        assert_eq!(patch.get_slice((-1, 0, 0)), &[0.0, -1.0]);
        assert_eq!(patch.get_slice((-2, 0, 0)), &[1.0, -1.0]);
        assert_eq!(patch.get_slice((4, 0, 0)), &[3.0, -1.0]);
    }

    #[test]
    fn corners_are_filled_in_two_dimensions() {
        let valid = range3d(0..3, 0..3, 0..1);
        let space = range3d(-1..4, -1..4, 0..1);
        let mut patch = ramp(space, &valid);
        let mesh = Mesh { lower: (0.0, 0.0, 0.0), upper: (1.0, 1.0, 1.0), size: (3, 3, 1), dimensionality: 2 };
        Boundary::default().fill(&mut patch, &valid, &mesh, &SimulationMetadata::default());
        assert!(patch.data().iter().all(|x| x.is_finite()));
        assert_eq!(patch.get((-1, -1, 0), 0), 0.0);
        assert_eq!(patch.get((3, 3, 0), 0), 22.0);
    }

    #[test]
    fn closure_boundary_sees_the_metadata() {
        let valid = range1d(0..4);
        let mut patch = ramp(valid.extend(1, Axis::I), &valid);
        let meta = SimulationMetadata { time: 2.5, ..Default::default() };
        let boundary = FnBoundary(|_: (i64, i64, i64), _: &Mesh, meta: &SimulationMetadata, s: &mut [f64]| {
            s[0] = meta.time;
            s[1] = 0.0;
        });
        boundary.fill(&mut patch, &valid, &Mesh::line(0.0, 1.0, 4), &meta);
        assert_eq!(patch.get((-1, 0, 0), 0), 2.5);
        assert_eq!(patch.get((4, 0, 0), 0), 2.5);
    }
}
