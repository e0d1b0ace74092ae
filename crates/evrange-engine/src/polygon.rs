//! Turns per-bearing search results into a closed reachability ring.
//!
//! Vertices are joined in ascending bearing order with no hull or
//! simplification pass. Oracle noise can therefore produce a
//! self-intersecting ring; it is rendered as-is.

use evrange_core::{Bearing, BoundaryPoint, ReachabilityPolygon};

use crate::error::EstimateError;

/// Assembled polygon plus the bookkeeping the renderer and diagnostics need.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub polygon: ReachabilityPolygon,
    /// Points that became vertices, in ring order.
    pub included: Vec<BoundaryPoint>,
    /// Bearings dropped because their search failed, ascending.
    pub excluded: Vec<Bearing>,
}

/// Builds the ring from search results in any completion order.
///
/// `OracleFailed` points are dropped, never substituted. A bearing reported
/// twice keeps its first occurrence after sorting.
///
/// # Errors
///
/// Returns [`EstimateError::InsufficientBoundaryPoints`] when fewer than
/// three usable points remain.
pub fn assemble(mut points: Vec<BoundaryPoint>) -> Result<Assembly, EstimateError> {
    // Stable sort keeps first-seen order among equal bearings for dedup.
    points.sort_by(|a, b| a.bearing.degrees().total_cmp(&b.bearing.degrees()));
    points.dedup_by(|later, earlier| later.bearing == earlier.bearing);

    let (included, failed): (Vec<BoundaryPoint>, Vec<BoundaryPoint>) =
        points.into_iter().partition(BoundaryPoint::is_usable);
    let excluded: Vec<Bearing> = failed.iter().map(|p| p.bearing).collect();

    if included.len() < 3 {
        return Err(EstimateError::InsufficientBoundaryPoints {
            resolved: included.len(),
            failed_bearings: excluded,
        });
    }

    let polygon =
        ReachabilityPolygon::from_vertices(included.iter().map(|p| p.coordinate).collect())?;
    Ok(Assembly {
        polygon,
        included,
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use evrange_core::{Coordinate, SearchStatus};

    use super::*;

    fn point(bearing: f64, status: SearchStatus) -> BoundaryPoint {
        BoundaryPoint {
            bearing: Bearing::new(bearing).unwrap(),
            coordinate: Coordinate::new(bearing / 10.0, bearing / 20.0).unwrap(),
            driving_distance_km: Some(100.0),
            duration_min: Some(60.0),
            iterations: 1,
            status,
        }
    }

    #[test]
    fn vertices_follow_bearing_not_input_order() {
        let points = vec![
            point(270.0, SearchStatus::Converged),
            point(0.0, SearchStatus::Converged),
            point(180.0, SearchStatus::ExhaustedIterations),
            point(90.0, SearchStatus::Converged),
        ];
        let assembly = assemble(points).unwrap();
        let bearings: Vec<f64> = assembly
            .included
            .iter()
            .map(|p| p.bearing.degrees())
            .collect();
        assert_eq!(bearings, vec![0.0, 90.0, 180.0, 270.0]);
        assert_eq!(assembly.polygon.vertex_count(), 4);
        assert_eq!(assembly.polygon.vertices()[1], assembly.included[1].coordinate);
        assert!(assembly.excluded.is_empty());
    }

    #[test]
    fn failed_bearings_are_excluded_not_substituted() {
        let points = vec![
            point(0.0, SearchStatus::Converged),
            point(90.0, SearchStatus::OracleFailed),
            point(180.0, SearchStatus::Converged),
            point(270.0, SearchStatus::Converged),
        ];
        let assembly = assemble(points).unwrap();
        assert_eq!(assembly.polygon.vertex_count(), 3);
        assert_eq!(assembly.excluded, vec![Bearing::new(90.0).unwrap()]);
    }

    #[test]
    fn fewer_than_three_usable_points_fails() {
        let points = vec![
            point(0.0, SearchStatus::Converged),
            point(120.0, SearchStatus::OracleFailed),
            point(240.0, SearchStatus::Converged),
        ];
        let result = assemble(points);
        match result {
            Err(EstimateError::InsufficientBoundaryPoints {
                resolved,
                failed_bearings,
            }) => {
                assert_eq!(resolved, 2);
                assert_eq!(failed_bearings.len(), 1);
            }
            other => panic!("expected InsufficientBoundaryPoints, got: {other:?}"),
        }
    }

    #[test]
    fn duplicate_bearing_keeps_one_vertex() {
        let mut dup = point(90.0, SearchStatus::Converged);
        dup.iterations = 9;
        let points = vec![
            point(0.0, SearchStatus::Converged),
            point(90.0, SearchStatus::Converged),
            dup,
            point(180.0, SearchStatus::Converged),
        ];
        let assembly = assemble(points).unwrap();
        assert_eq!(assembly.polygon.vertex_count(), 3);
        assert_eq!(assembly.included[1].iterations, 1);
    }

    #[test]
    fn ring_is_closed() {
        let points = vec![
            point(0.0, SearchStatus::Converged),
            point(120.0, SearchStatus::Converged),
            point(240.0, SearchStatus::Converged),
        ];
        let ring = assemble(points).unwrap().polygon.ring().to_vec();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }
}
