//! Metrics sink boundary.
//!
//! Rendering and evaluation MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{obs::metrics, render::Dialect};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Render {
        dialect: Dialect,
        params: u64,
        neutral: bool,
    },
    SubqueryScan {
        rows_scanned: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::Render {
                dialect,
                params,
                neutral,
            } => metrics::with_state_mut(|m| {
                match dialect {
                    Dialect::Postgres => {
                        m.ops.renders_postgres = m.ops.renders_postgres.saturating_add(1);
                    }
                    Dialect::Generic => {
                        m.ops.renders_generic = m.ops.renders_generic.saturating_add(1);
                    }
                }
                if neutral {
                    m.ops.renders_neutral = m.ops.renders_neutral.saturating_add(1);
                }
                m.ops.params_bound = m.ops.params_bound.saturating_add(params);
            }),

            MetricsEvent::SubqueryScan { rows_scanned } => metrics::with_state_mut(|m| {
                m.ops.subquery_scans = m.ops.subquery_scans.saturating_add(1);
                m.ops.subquery_rows_scanned =
                    m.ops.subquery_rows_scanned.saturating_add(rows_scanned);
            }),
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset the current thread's counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Capture(RefCell<Vec<MetricsEvent>>);

    impl MetricsSink for Capture {
        fn record(&self, event: MetricsEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    #[test]
    fn global_sink_accumulates_render_counters() {
        metrics_reset_all();

        record(MetricsEvent::Render {
            dialect: Dialect::Postgres,
            params: 2,
            neutral: false,
        });
        record(MetricsEvent::Render {
            dialect: Dialect::Generic,
            params: 0,
            neutral: true,
        });

        let ops = metrics_report().ops;
        assert_eq!(ops.renders_postgres, 1);
        assert_eq!(ops.renders_generic, 1);
        assert_eq!(ops.renders_neutral, 1);
        assert_eq!(ops.params_bound, 2);
    }

    #[test]
    fn override_captures_events_and_restores_global_sink() {
        metrics_reset_all();
        let capture = Rc::new(Capture::default());

        with_metrics_sink(capture.clone(), || {
            record(MetricsEvent::SubqueryScan { rows_scanned: 4 });
        });
        record(MetricsEvent::SubqueryScan { rows_scanned: 1 });

        assert_eq!(
            capture.0.borrow().as_slice(),
            &[MetricsEvent::SubqueryScan { rows_scanned: 4 }]
        );
        let ops = metrics_report().ops;
        assert_eq!(ops.subquery_scans, 1);
        assert_eq!(ops.subquery_rows_scanned, 1);
    }

    #[test]
    fn report_serializes_counters() {
        metrics_reset_all();
        record(MetricsEvent::Render {
            dialect: Dialect::Generic,
            params: 3,
            neutral: false,
        });

        let json = serde_json::to_value(metrics_report()).expect("report serializes");
        assert_eq!(json["ops"]["renders_generic"], 1);
        assert_eq!(json["ops"]["params_bound"], 3);
        assert_eq!(json["ops"]["renders_postgres"], 0);
    }
}
