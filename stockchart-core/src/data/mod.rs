//! Price data: wire table, column resolution, sources

pub mod http;
pub mod provider;
pub mod table;

pub use http::{endpoint_url, HttpPriceSource};
pub use provider::{FetchError, HealthStatus, PriceSource};
pub use table::{resolve_column, MissingColumns, OhlcColumns, ShapeError, TabularResponse};
