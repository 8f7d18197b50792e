//! Registry document fetching from remote sources.

pub mod http;

pub use http::{FetchResponse, HttpFetcher, HttpStatusError};
