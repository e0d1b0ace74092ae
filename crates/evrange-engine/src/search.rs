//! Boundary search along a single bearing.
//!
//! Driving distance grows roughly in proportion to straight-line distance
//! with a locally stable detour ratio, so each probe rescales the guess by
//! `usable / observed`. This usually lands within tolerance in two or three
//! probes, far fewer than a bisection would spend against a rate-limited API.

use evrange_core::{destination_point, Bearing, BoundaryPoint, Coordinate, SearchStatus};
use evrange_oracle::DistanceOracle;

use crate::params::SearchParams;
use crate::retry::retry_with_backoff;

/// Finds the boundary point for one bearing.
///
/// Never fails: oracle trouble downgrades the result to
/// [`SearchStatus::OracleFailed`], and running out of iterations yields
/// [`SearchStatus::ExhaustedIterations`] with the last probed candidate.
pub async fn search_bearing<O: DistanceOracle>(
    oracle: &O,
    start: Coordinate,
    bearing: Bearing,
    usable_km: f64,
    params: &SearchParams,
) -> BoundaryPoint {
    let upper = params.max_scale * usable_km;
    let lower = params.min_distance_km.min(upper);
    let tolerance = params.tolerance_for(usable_km);

    let mut guess_km = usable_km;
    let mut last: Option<BoundaryPoint> = None;

    for iteration in 1..=params.max_iterations {
        let candidate = match destination_point(start, bearing.degrees(), guess_km) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(%bearing, guess_km, error = %e, "could not project candidate");
                return BoundaryPoint::failed(bearing, start, iteration - 1);
            }
        };

        let probe = retry_with_backoff(
            params.max_oracle_retries,
            params.retry_backoff_base_ms,
            || oracle.driving_distance(start, candidate),
        )
        .await;

        let route = match probe {
            Ok(route) => route,
            Err(e) => {
                tracing::warn!(
                    %bearing,
                    iteration,
                    backend = oracle.backend_name(),
                    error = %e,
                    "bearing abandoned after oracle failure"
                );
                return BoundaryPoint::failed(bearing, candidate, iteration);
            }
        };

        tracing::debug!(
            %bearing,
            iteration,
            guess_km,
            observed_km = route.distance_km,
            target_km = usable_km,
            "probed candidate"
        );

        let mut point = BoundaryPoint {
            bearing,
            coordinate: candidate,
            driving_distance_km: Some(route.distance_km),
            duration_min: Some(route.duration_min),
            iterations: iteration,
            status: SearchStatus::ExhaustedIterations,
        };

        if (route.distance_km - usable_km).abs() <= tolerance {
            point.status = SearchStatus::Converged;
            return point;
        }
        last = Some(point);

        // Zero means the candidate snapped onto the start: push out as far as allowed.
        let next = if route.distance_km > 0.0 {
            guess_km * usable_km / route.distance_km
        } else {
            upper
        };
        guess_km = next.clamp(lower, upper);
    }

    match last {
        Some(point) => {
            tracing::debug!(
                %bearing,
                observed_km = ?point.driving_distance_km,
                "iterations exhausted, keeping last candidate"
            );
            point
        }
        // Unreachable with max_iterations ≥ 1, which SearchParams::validate enforces.
        None => BoundaryPoint::failed(bearing, start, 0),
    }
}
