pub mod decision;
pub mod format;
pub mod lifecycle;
pub mod normalize;
pub mod query;
pub mod stats;

pub use decision::{DecisionDate, DecisionKey, DecisionRecord, ResultSummary};
pub use format::format_fine_amount;
pub use lifecycle::{ErrorKind, Failure, RequestLifecycle, RequestState, RequestToken};
pub use normalize::normalize;
pub use query::{QueryBuilder, QueryError, SearchFilters, SearchRequest};
pub use stats::{DashboardSnapshot, Distribution, StatsAggregator};
