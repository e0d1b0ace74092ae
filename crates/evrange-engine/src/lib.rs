//! Reachability estimation: per-bearing boundary search, polygon assembly,
//! and map rendering on top of a [`evrange_oracle::DistanceOracle`].

pub mod error;
pub mod estimator;
pub mod params;
pub mod polygon;
pub mod render;
mod retry;
pub mod search;

pub use error::EstimateError;
pub use estimator::{RangeEstimator, ReachabilityResult};
pub use params::SearchParams;
pub use polygon::{assemble, Assembly};
pub use render::{save_map, LeafletRenderer, MapRenderer};
pub use search::search_bearing;
