pub mod app_config;
pub mod config;
pub mod error;
pub mod geo;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, require_api_key};
pub use error::{ConfigError, CoreError};
pub use geo::{destination_point, haversine_km, initial_bearing, EARTH_RADIUS_KM};
pub use types::{
    Backend, Bearing, BoundaryPoint, Coordinate, RangeRequest, ReachabilityPolygon, SearchStatus,
    MIN_DIRECTIONS,
};
