use serde::{Deserialize, Serialize};

/// Driving distance and duration between two points as reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance_km: f64,
    pub duration_min: f64,
}

impl Route {
    /// Converts the metre/second units every backend reports.
    #[must_use]
    pub fn from_meters_seconds(distance_m: f64, duration_s: f64) -> Self {
        Self {
            distance_km: distance_m / 1000.0,
            duration_min: duration_s / 60.0,
        }
    }
}

// ---------------------------------------------------------------------------
// OpenRouteService GeoJSON directions response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct OrsDirectionsResponse {
    #[serde(default)]
    pub features: Vec<OrsFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrsFeature {
    pub properties: OrsProperties,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrsProperties {
    #[serde(default)]
    pub summary: OrsSummary,
}

/// ORS omits both fields when start and end snap to the same point.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct OrsSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

/// ORS error envelope: `{"error": {"code": 2010, "message": "..."}}` or
/// `{"error": "message"}` depending on which layer rejected the request.
#[derive(Debug, Deserialize)]
pub(crate) struct OrsErrorResponse {
    pub error: OrsErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OrsErrorBody {
    Detailed {
        code: Option<i64>,
        message: Option<String>,
    },
    Message(String),
}

// ---------------------------------------------------------------------------
// Google Directions API response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleDirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<GoogleRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleRoute {
    #[serde(default)]
    pub legs: Vec<GoogleLeg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleLeg {
    pub distance: GoogleValue,
    pub duration: GoogleValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleValue {
    pub value: f64,
}
