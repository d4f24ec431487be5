//! Live metrics sampling and fleet aggregation

mod aggregator;
mod source;
mod system;

pub use aggregator::MetricsAggregator;
pub use source::{MetricsSource, SystemMetricsSource};
