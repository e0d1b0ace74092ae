//! Driving-distance oracle: one contract over interchangeable routing backends.

pub mod error;
pub mod google;
mod http;
pub mod memo;
pub mod oracle;
pub mod ors;
pub mod types;

pub use error::OracleError;
pub use google::GoogleClient;
pub use memo::{MemoStats, MemoizedOracle};
pub use oracle::{DistanceOracle, OracleClient};
pub use ors::OrsClient;
pub use types::Route;
