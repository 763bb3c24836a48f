use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::registry::MetricRegistry;

use super::call::{CallInfo, CallSite, Measures, PendingCall};
use super::hooks::{HookChain, Terminal};

/// Call ids are shared by every boundary in the process.
static NEXT_CALL_ID: AtomicU64 = AtomicU64::new(1);

/// Enter/exit contract for instrumented call sites.
///
/// Cheap to clone; every clone writes into the same registry.
#[derive(Clone)]
pub struct InstrumentationBoundary {
    registry: Arc<MetricRegistry>,
    measures: Measures,
}

impl InstrumentationBoundary {
    pub fn new(registry: Arc<MetricRegistry>, measures: Measures) -> Self {
        Self { registry, measures }
    }

    pub fn measures(&self) -> Measures {
        self.measures
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    /// Start timing one call.
    pub fn enter(&self, site: &CallSite) -> PendingCall {
        PendingCall {
            metric_name: Arc::from(site.metric_name()),
            started: Instant::now(),
            call_id: NEXT_CALL_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Finish a synchronous call. `result` is returned untouched.
    pub fn exit_sync<T, E>(&self, pending: PendingCall, result: Result<T, E>) -> Result<T, E> {
        let elapsed = pending.elapsed();
        self.account(&pending.metric_name, elapsed);
        result
    }

    /// `enter`, run `f`, `exit_sync`. Metrics are recorded even if `f` panics.
    pub fn run_sync<T, E, F>(&self, site: &CallSite, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut finish = Finish::<T, E>::new(self, self.enter(site), None, Terminal::Faulted);
        let result = f();
        finish.stop(Terminal::of(&result));
        result
    }

    /// Wrap the future returned by an instrumented call.
    ///
    /// The wrapper resolves to exactly what `fut` resolves to. Once polled,
    /// metrics are recorded exactly once: when `fut` finishes, when it panics
    /// (`Terminal::Faulted`), or when the wrapper is dropped first
    /// (`Terminal::Cancelled`).
    pub fn attach_async_completion<F, T, E>(
        &self,
        pending: PendingCall,
        fut: F,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.attach_async_completion_with(pending, fut, HookChain::new())
    }

    /// Like [`attach_async_completion`](Self::attach_async_completion), with
    /// hooks that may observe the outcome or override a fault.
    pub fn attach_async_completion_with<F, T, E>(
        &self,
        pending: PendingCall,
        fut: F,
        hooks: HookChain<T, E>,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let boundary = self.clone();
        async move {
            let mut finish = Finish::new(&boundary, pending, Some(&hooks), Terminal::Cancelled);
            let result = fut.await;

            let elapsed = finish.stop(Terminal::of(&result));
            let info = CallInfo {
                metric_name: &finish.call.metric_name,
                call_id: finish.call.call_id,
                elapsed,
            };
            let result = hooks.settle(&info, result);

            finish.terminal = Terminal::of(&result);
            result
        }
    }

    /// `enter` + `attach_async_completion`.
    pub fn instrument<F, T, E>(&self, site: &CallSite, fut: F) -> impl Future<Output = Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.attach_async_completion(self.enter(site), fut)
    }

    /// `enter` + `attach_async_completion_with`.
    pub fn instrument_with<F, T, E>(
        &self,
        site: &CallSite,
        fut: F,
        hooks: HookChain<T, E>,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.attach_async_completion_with(self.enter(site), fut, hooks)
    }

    fn account(&self, name: &str, elapsed: Duration) {
        if self.measures.count {
            self.registry.increment(name);
        }
        if self.measures.duration {
            self.registry.record_duration(name, elapsed);
        }
    }
}

/// Records metrics and runs `on_finished` when dropped, whichever way the
/// call ends.
struct Finish<'a, T, E> {
    boundary: &'a InstrumentationBoundary,
    hooks: Option<&'a HookChain<T, E>>,
    call: PendingCall,
    elapsed: Option<Duration>,
    terminal: Terminal,
}

impl<'a, T, E> Finish<'a, T, E> {
    fn new(
        boundary: &'a InstrumentationBoundary,
        call: PendingCall,
        hooks: Option<&'a HookChain<T, E>>,
        terminal: Terminal,
    ) -> Self {
        Self {
            boundary,
            hooks,
            call,
            elapsed: None,
            terminal,
        }
    }

    /// Stop the timer.
    fn stop(&mut self, terminal: Terminal) -> Duration {
        let elapsed = self.call.elapsed();
        self.elapsed = Some(elapsed);
        self.terminal = terminal;
        elapsed
    }
}

impl<T, E> Drop for Finish<'_, T, E> {
    fn drop(&mut self) {
        if self.terminal == Terminal::Cancelled && std::thread::panicking() {
            self.terminal = Terminal::Faulted;
        }
        let elapsed = self.elapsed.unwrap_or_else(|| self.call.elapsed());
        self.boundary.account(&self.call.metric_name, elapsed);

        if self.terminal == Terminal::Cancelled {
            tracing::debug!(metric = %self.call.metric_name, call_id = self.call.call_id, "instrumented call dropped before completion");
        }

        if let Some(hooks) = self.hooks {
            let info = CallInfo {
                metric_name: &self.call.metric_name,
                call_id: self.call.call_id,
                elapsed,
            };
            hooks.finished(&info, self.terminal);
        }
    }
}
