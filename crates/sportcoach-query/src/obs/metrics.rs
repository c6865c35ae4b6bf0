use serde::Serialize;
use std::cell::RefCell;

///
/// EventState
/// Ephemeral, thread-local counters.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Rendering
    pub renders_postgres: u64,
    pub renders_generic: u64,
    pub renders_neutral: u64,
    pub params_bound: u64,

    // Evaluation
    pub subquery_scans: u64,
    pub subquery_rows_scanned: u64,
}

///
/// EventReport
/// Point-in-time snapshot returned to callers.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
}

thread_local! {
    static STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

pub(crate) fn report() -> EventReport {
    STATE.with(|state| EventReport {
        ops: state.borrow().ops.clone(),
    })
}

pub(crate) fn reset_all() {
    with_state_mut(|state| *state = EventState::default());
}
