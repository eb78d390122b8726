//! YouTube Music playlist retrieval.

pub mod api;
pub mod models;
pub mod url;

pub use api::YtmClient;
