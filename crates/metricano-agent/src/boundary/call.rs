use std::sync::Arc;
use std::time::{Duration, Instant};

use metricano_core::CallDescriptor;

/// Which metrics a boundary writes on finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measures {
    pub count: bool,
    pub duration: bool,
}

impl Measures {
    /// Count executions and record their duration.
    pub const ALL: Measures = Measures { count: true, duration: true };
    /// Count executions only.
    pub const COUNT: Measures = Measures { count: true, duration: false };
    /// Record execution time only.
    pub const DURATION: Measures = Measures { count: false, duration: true };
}

impl Default for Measures {
    fn default() -> Self {
        Measures::ALL
    }
}

/// An instrumented call site with its metric name resolved once.
#[derive(Debug, Clone)]
pub struct CallSite {
    descriptor: CallDescriptor,
    metric_name: Arc<str>,
}

impl CallSite {
    /// Metric name derived from the descriptor.
    pub fn new(descriptor: CallDescriptor) -> Self {
        Self::named(descriptor, None)
    }

    /// Metric name `name` unless it is blank.
    pub fn named(descriptor: CallDescriptor, name: Option<&str>) -> Self {
        let metric_name = Arc::from(descriptor.resolve_name(name));
        Self { descriptor, metric_name }
    }

    pub fn descriptor(&self) -> &CallDescriptor {
        &self.descriptor
    }

    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }
}

impl From<CallDescriptor> for CallSite {
    fn from(descriptor: CallDescriptor) -> Self {
        CallSite::new(descriptor)
    }
}

/// Per-call timing state. Created by `enter`, consumed when the call
/// finishes.
#[derive(Debug)]
pub struct PendingCall {
    pub(crate) metric_name: Arc<str>,
    pub(crate) started: Instant,
    pub(crate) call_id: u64,
}

impl PendingCall {
    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    pub fn call_id(&self) -> u64 {
        self.call_id
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What hooks get to see about the finishing call.
#[derive(Debug, Clone, Copy)]
pub struct CallInfo<'a> {
    pub metric_name: &'a str,
    pub call_id: u64,
    pub elapsed: Duration,
}
