//! The sample/event data model emitted by [`crate::parser::EventStreamParser`].

use std::fmt;

/// One stack frame of a sample, deepest callee first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// An ordinary code frame: `<address> <symbol> (<module>)` in the
    /// source text.
    StackFrame {
        /// The hex address text as it appeared in the input, e.g. `"aaaaaaaa"`.
        address: String,
        module: String,
        symbol: String,
    },
    /// A synthetic frame appended after the last real frame of a sample.
    ThreadFrame { id: i32, name: String },
    /// A synthetic frame appended after the thread frame.
    ProcessFrame { name: String },
    /// Reserved for downstream passes; never produced by this crate.
    BlockedCpuFrame { id: i32, subkind: String },
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::StackFrame { module, symbol, .. } => write!(f, "{module}!{symbol}"),
            Frame::ThreadFrame { id, name } => write!(f, "{name} ({id})"),
            Frame::ProcessFrame { name } => write!(f, "{name}"),
            Frame::BlockedCpuFrame { subkind, .. } => write!(f, "{subkind}"),
        }
    }
}

/// The kind of tracepoint a sample was recorded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Cpu,
    Scheduler,
}

/// A `prev_comm=... ==> next_comm=...` scheduler context-switch payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSwitch {
    pub previous_command: String,
    pub previous_tid: i32,
    pub previous_priority: i32,
    pub previous_state: char,
    pub next_command: String,
    pub next_tid: i32,
    pub next_priority: i32,
}

/// One sample parsed out of `perf script` output: a header plus a call
/// stack, and, for `Scheduler` events, a [`ScheduleSwitch`] payload.
///
/// `time_msec` is the perf-reported seconds multiplied by 1000; `period`
/// defaults to `0.0` and is only ever set by a later, out-of-scope pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub command: String,
    pub pid: i32,
    pub tid: i32,
    pub cpu: u32,
    pub time_msec: f64,
    pub time_property: i32,
    pub event_name: String,
    pub event_detail: String,
    pub frames: Vec<Frame>,
    pub period: f64,
    pub kind: EventKind,
    pub schedule_switch: Option<ScheduleSwitch>,
}
