use std::fmt;
use std::sync::Arc;

use super::call::CallInfo;

/// How a call ended, as seen by `on_finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// Returned `Ok`.
    Completed,
    /// Returned `Err`.
    Faulted,
    /// Dropped before reaching a result.
    Cancelled,
}

impl Terminal {
    pub fn of<T, E>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Terminal::Completed,
            Err(_) => Terminal::Faulted,
        }
    }
}

/// Returned by `on_faulted` to decide what the caller observes.
pub enum FlowDecision<T, E> {
    /// Pass the fault on unchanged.
    Propagate,
    /// Replace the fault with another one.
    Substitute(E),
    /// Swallow the fault and resolve with this value; later hooks see a completion.
    Continue(T),
    /// Swallow the fault and resolve with this value; later hooks are skipped.
    Return(T),
}

impl<T, E> fmt::Debug for FlowDecision<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowDecision::Propagate => "Propagate",
            FlowDecision::Substitute(_) => "Substitute",
            FlowDecision::Continue(_) => "Continue",
            FlowDecision::Return(_) => "Return",
        })
    }
}

/// Hooks run when an asynchronous call reaches a terminal state.
///
/// Defaults observe nothing and change nothing. A hook returning `Err`
/// ends hook processing; that error becomes the call's outcome, and the
/// accounting still happens.
pub trait CompletionHooks<T, E>: Send + Sync {
    fn on_faulted(&self, _call: &CallInfo<'_>, _fault: &E) -> Result<FlowDecision<T, E>, E> {
        Ok(FlowDecision::Propagate)
    }

    fn on_completed(&self, _call: &CallInfo<'_>, _value: &T) -> Result<(), E> {
        Ok(())
    }

    /// Runs exactly once per call after metrics were recorded, with the
    /// terminal state the caller observes. Must not panic.
    fn on_finished(&self, _call: &CallInfo<'_>, _terminal: Terminal) {}
}

/// Ordered hooks applied to one call site.
pub struct HookChain<T, E> {
    hooks: Vec<Arc<dyn CompletionHooks<T, E>>>,
}

impl<T, E> Default for HookChain<T, E> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<T, E> Clone for HookChain<T, E> {
    fn clone(&self) -> Self {
        Self { hooks: self.hooks.clone() }
    }
}

impl<T, E> HookChain<T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hook: impl CompletionHooks<T, E> + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn with_shared(mut self, hook: Arc<dyn CompletionHooks<T, E>>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run fault/completion hooks in order and produce the caller's result.
    pub(crate) fn settle(&self, call: &CallInfo<'_>, result: Result<T, E>) -> Result<T, E> {
        let mut current = result;
        for hook in &self.hooks {
            current = match current {
                Ok(value) => match hook.on_completed(call, &value) {
                    Ok(()) => Ok(value),
                    Err(e) => return Err(e),
                },
                Err(fault) => match hook.on_faulted(call, &fault) {
                    Ok(FlowDecision::Propagate) => Err(fault),
                    Ok(FlowDecision::Substitute(e)) => Err(e),
                    Ok(FlowDecision::Continue(v)) => Ok(v),
                    Ok(FlowDecision::Return(v)) => return Ok(v),
                    Err(e) => return Err(e),
                },
            };
        }
        current
    }

    pub(crate) fn finished(&self, call: &CallInfo<'_>, terminal: Terminal) {
        for hook in &self.hooks {
            hook.on_finished(call, terminal);
        }
    }
}
