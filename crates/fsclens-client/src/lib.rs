pub mod api;
pub mod config;
pub mod documents;
pub mod error;
pub mod http;
pub mod session;

pub use api::{DashboardSummaries, SearchApi, SearchResponse};
pub use config::{ClientConfig, ConfigError};
pub use documents::DocumentLinks;
pub use error::ClientError;
pub use http::HttpSearchApi;
pub use session::{DashboardSession, SearchResults, SearchSession, SearchTicket};
