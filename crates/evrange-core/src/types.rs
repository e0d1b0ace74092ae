//! Domain types shared by the oracle, search engine, and renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Creates a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if either component is not finite,
    /// latitude is outside `[-90, 90]`, or longitude is outside `[-180, 180]`.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoreError> {
        let coord = Self { lat, lon };
        coord.validate()?;
        Ok(coord)
    }

    /// Checks the coordinate invariants without constructing a new value.
    ///
    /// Fields are public, so values built with struct syntax are re-checked
    /// at every trust boundary (oracle calls, request construction).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] describing the first violated bound.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(CoreError::InvalidArgument(format!(
                "coordinate ({}, {}) is not finite",
                self.lat, self.lon
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(CoreError::InvalidArgument(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(CoreError::InvalidArgument(format!(
                "longitude {} outside [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Compass direction in degrees clockwise from true north, normalized to `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Bearing(f64);

impl TryFrom<f64> for Bearing {
    type Error = CoreError;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        Self::new(degrees)
    }
}

impl From<Bearing> for f64 {
    fn from(bearing: Bearing) -> Self {
        bearing.0
    }
}

impl Bearing {
    /// Wraps `degrees` into `[0, 360)`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `degrees` is not finite.
    pub fn new(degrees: f64) -> Result<Self, CoreError> {
        if !degrees.is_finite() {
            return Err(CoreError::InvalidArgument(format!(
                "bearing {degrees} is not finite"
            )));
        }
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
        Ok(Self(if wrapped >= 360.0 { 0.0 } else { wrapped }))
    }

    #[must_use]
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// `count` bearings evenly spaced by `360 / count`, starting at due north.
    #[must_use]
    pub fn evenly_spaced(count: u32) -> Vec<Self> {
        let step = 360.0 / f64::from(count.max(1));
        (0..count).map(|i| Self(f64::from(i) * step)).collect()
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// Which routing service answers driving-distance queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    OpenRouteService,
    Google,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::OpenRouteService => write!(f, "openrouteservice"),
            Backend::Google => write!(f, "google"),
        }
    }
}

/// Minimum number of directions that can enclose an area.
pub const MIN_DIRECTIONS: u32 = 3;

/// A validated reachability query. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeRequest {
    start: Coordinate,
    battery_range_km: f64,
    buffer_km: f64,
    directions: u32,
    backend: Backend,
}

impl RangeRequest {
    /// Validates and builds a request.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] when the start coordinate is
    /// invalid, the range is not a positive finite number, the buffer is
    /// negative or not smaller than the range, or fewer than
    /// [`MIN_DIRECTIONS`] directions are requested.
    pub fn new(
        start: Coordinate,
        battery_range_km: f64,
        buffer_km: f64,
        directions: u32,
        backend: Backend,
    ) -> Result<Self, CoreError> {
        start.validate()?;
        if !battery_range_km.is_finite() || battery_range_km <= 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "battery range must be a positive number of km, got {battery_range_km}"
            )));
        }
        if !buffer_km.is_finite() || buffer_km < 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "safety buffer must be non-negative, got {buffer_km}"
            )));
        }
        if buffer_km >= battery_range_km {
            return Err(CoreError::InvalidArgument(format!(
                "safety buffer ({buffer_km} km) must be smaller than battery range ({battery_range_km} km)"
            )));
        }
        if directions < MIN_DIRECTIONS {
            return Err(CoreError::InvalidArgument(format!(
                "at least {MIN_DIRECTIONS} directions are required, got {directions}"
            )));
        }
        Ok(Self {
            start,
            battery_range_km,
            buffer_km,
            directions,
            backend,
        })
    }

    #[must_use]
    pub fn start(&self) -> Coordinate {
        self.start
    }

    #[must_use]
    pub fn battery_range_km(&self) -> f64 {
        self.battery_range_km
    }

    #[must_use]
    pub fn buffer_km(&self) -> f64 {
        self.buffer_km
    }

    #[must_use]
    pub fn directions(&self) -> u32 {
        self.directions
    }

    #[must_use]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Battery range minus the safety buffer: the target driving distance.
    #[must_use]
    pub fn usable_range_km(&self) -> f64 {
        self.battery_range_km - self.buffer_km
    }

    #[must_use]
    pub fn bearings(&self) -> Vec<Bearing> {
        Bearing::evenly_spaced(self.directions)
    }
}

/// How a single bearing's search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Observed driving distance landed within tolerance of the usable range.
    Converged,
    /// Iteration cap hit; the last candidate is kept as a best effort.
    ExhaustedIterations,
    /// No usable observation: no route, retries exhausted, or deadline hit.
    OracleFailed,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::Converged => write!(f, "converged"),
            SearchStatus::ExhaustedIterations => write!(f, "exhausted-iterations"),
            SearchStatus::OracleFailed => write!(f, "oracle-failed"),
        }
    }
}

/// The outcome of one bearing's boundary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub bearing: Bearing,
    pub coordinate: Coordinate,
    /// Driving distance reported by the oracle for `coordinate`, if any.
    pub driving_distance_km: Option<f64>,
    pub duration_min: Option<f64>,
    /// Oracle queries spent on this bearing (retries excluded).
    pub iterations: u32,
    pub status: SearchStatus,
}

impl BoundaryPoint {
    /// A point that produced no usable oracle observation.
    #[must_use]
    pub fn failed(bearing: Bearing, coordinate: Coordinate, iterations: u32) -> Self {
        Self {
            bearing,
            coordinate,
            driving_distance_km: None,
            duration_min: None,
            iterations,
            status: SearchStatus::OracleFailed,
        }
    }

    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.status != SearchStatus::OracleFailed
    }
}

/// Closed ring of boundary coordinates ordered by ascending bearing.
///
/// The first vertex is repeated at the end; [`ReachabilityPolygon::vertex_count`]
/// excludes that closing copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRing")]
pub struct ReachabilityPolygon {
    ring: Vec<Coordinate>,
}

/// Unchecked wire form of [`ReachabilityPolygon`].
#[derive(Deserialize)]
struct RawRing {
    ring: Vec<Coordinate>,
}

impl TryFrom<RawRing> for ReachabilityPolygon {
    type Error = CoreError;

    fn try_from(raw: RawRing) -> Result<Self, Self::Error> {
        let mut ring = raw.ring;
        if ring.len() < 2 || ring.first() != ring.last() {
            return Err(CoreError::InvalidArgument(
                "polygon ring must repeat its first vertex at the end".to_owned(),
            ));
        }
        ring.pop();
        for vertex in &ring {
            vertex.validate()?;
        }
        Self::from_vertices(ring)
    }
}

impl ReachabilityPolygon {
    /// Closes `vertices` into a ring. Callers guarantee bearing order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] with fewer than three vertices.
    pub fn from_vertices(mut vertices: Vec<Coordinate>) -> Result<Self, CoreError> {
        if vertices.len() < 3 {
            return Err(CoreError::InvalidArgument(format!(
                "a polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        vertices.push(vertices[0]);
        Ok(Self { ring: vertices })
    }

    /// Ring including the closing vertex.
    #[must_use]
    pub fn ring(&self) -> &[Coordinate] {
        &self.ring
    }

    /// Distinct vertices (closing copy excluded).
    #[must_use]
    pub fn vertices(&self) -> &[Coordinate] {
        &self.ring[..self.ring.len() - 1]
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.ring.len() - 1
    }

    /// GeoJSON-order `[lon, lat]` pairs of the closed ring.
    #[must_use]
    pub fn to_lon_lat(&self) -> Vec<[f64; 2]> {
        self.ring.iter().map(|c| [c.lon, c.lat]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin() -> Coordinate {
        Coordinate::new(52.52, 13.405).unwrap()
    }

    #[test]
    fn coordinate_rejects_out_of_range_latitude() {
        assert!(matches!(
            Coordinate::new(91.0, 0.0),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn coordinate_rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn coordinate_accepts_bounds() {
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
        assert!(Coordinate::new(90.0, -180.0).is_ok());
    }

    #[test]
    fn bearing_wraps_into_range() {
        assert!((Bearing::new(370.0).unwrap().degrees() - 10.0).abs() < 1e-12);
        assert!((Bearing::new(-90.0).unwrap().degrees() - 270.0).abs() < 1e-12);
        assert!(Bearing::new(-1e-20).unwrap().degrees() < 360.0);
    }

    #[test]
    fn evenly_spaced_starts_at_north() {
        let bearings = Bearing::evenly_spaced(16);
        assert_eq!(bearings.len(), 16);
        assert!(bearings[0].degrees().abs() < f64::EPSILON);
        assert!((bearings[4].degrees() - 90.0).abs() < 1e-12);
        assert!(bearings.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn range_request_computes_usable_range() {
        let req = RangeRequest::new(berlin(), 150.0, 10.0, 16, Backend::OpenRouteService)
            .unwrap();
        assert!((req.usable_range_km() - 140.0).abs() < f64::EPSILON);
        assert_eq!(req.bearings().len(), 16);
    }

    #[test]
    fn range_request_rejects_two_directions() {
        let result = RangeRequest::new(berlin(), 150.0, 10.0, 2, Backend::OpenRouteService);
        assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn range_request_rejects_buffer_not_below_range() {
        assert!(RangeRequest::new(berlin(), 10.0, 10.0, 8, Backend::Google).is_err());
        assert!(RangeRequest::new(berlin(), 10.0, -1.0, 8, Backend::Google).is_err());
    }

    #[test]
    fn range_request_rejects_non_positive_range() {
        assert!(RangeRequest::new(berlin(), 0.0, 0.0, 8, Backend::Google).is_err());
        assert!(RangeRequest::new(berlin(), f64::NAN, 0.0, 8, Backend::Google).is_err());
    }

    #[test]
    fn range_request_revalidates_struct_built_start() {
        let bad = Coordinate {
            lat: 120.0,
            lon: 0.0,
        };
        assert!(RangeRequest::new(bad, 100.0, 0.0, 8, Backend::Google).is_err());
    }

    #[test]
    fn polygon_is_closed() {
        let verts = vec![
            Coordinate::new(0.0, 0.0).unwrap(),
            Coordinate::new(1.0, 0.0).unwrap(),
            Coordinate::new(1.0, 1.0).unwrap(),
        ];
        let polygon = ReachabilityPolygon::from_vertices(verts).unwrap();
        assert_eq!(polygon.vertex_count(), 3);
        assert_eq!(polygon.ring().len(), 4);
        assert_eq!(polygon.ring()[0], polygon.ring()[3]);
        assert_eq!(polygon.to_lon_lat()[1], [0.0, 1.0]);
    }

    #[test]
    fn bearing_deserializes_through_constructor() {
        let wrapped: Bearing = serde_json::from_str("720.0").unwrap();
        assert!(wrapped.degrees().abs() < f64::EPSILON);
        let west: Bearing = serde_json::from_str("-90.0").unwrap();
        assert!((west.degrees() - 270.0).abs() < 1e-12);
        assert_eq!(serde_json::to_string(&west).unwrap(), "270.0");
    }

    #[test]
    fn polygon_deserialization_keeps_ring_invariants() {
        let verts = vec![
            Coordinate::new(0.0, 0.0).unwrap(),
            Coordinate::new(1.0, 0.0).unwrap(),
            Coordinate::new(1.0, 1.0).unwrap(),
        ];
        let polygon = ReachabilityPolygon::from_vertices(verts).unwrap();
        let json = serde_json::to_string(&polygon).unwrap();
        let back: ReachabilityPolygon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, polygon);
        assert_eq!(back.vertex_count(), 3);

        assert!(serde_json::from_str::<ReachabilityPolygon>(r#"{"ring":[]}"#).is_err());
        let unclosed = r#"{"ring":[{"lat":0.0,"lon":0.0},{"lat":1.0,"lon":0.0},{"lat":1.0,"lon":1.0},{"lat":2.0,"lon":2.0}]}"#;
        assert!(serde_json::from_str::<ReachabilityPolygon>(unclosed).is_err());
        let too_small = r#"{"ring":[{"lat":0.0,"lon":0.0},{"lat":1.0,"lon":0.0},{"lat":0.0,"lon":0.0}]}"#;
        assert!(serde_json::from_str::<ReachabilityPolygon>(too_small).is_err());
        let out_of_range = r#"{"ring":[{"lat":0.0,"lon":0.0},{"lat":95.0,"lon":0.0},{"lat":1.0,"lon":1.0},{"lat":0.0,"lon":0.0}]}"#;
        assert!(serde_json::from_str::<ReachabilityPolygon>(out_of_range).is_err());
    }

    #[test]
    fn polygon_rejects_two_vertices() {
        let verts = vec![
            Coordinate::new(0.0, 0.0).unwrap(),
            Coordinate::new(1.0, 0.0).unwrap(),
        ];
        assert!(ReachabilityPolygon::from_vertices(verts).is_err());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&SearchStatus::ExhaustedIterations).unwrap();
        assert_eq!(json, "\"exhausted_iterations\"");
    }
}
