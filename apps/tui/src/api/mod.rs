pub mod endpoints;
pub mod fetcher;
pub mod models;

pub use endpoints::{ApiBase, ApiError, DEFAULT_BASE_URL};
pub use fetcher::{fetch_as, DataFetcher, FetchError, HttpFetcher};
