//! Observability: in-process counters and the metrics sink boundary.
//!
//! Condition builders never record anything. Only rendering and
//! sub-query evaluation emit events.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
