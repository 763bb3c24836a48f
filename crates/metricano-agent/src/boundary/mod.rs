//! Instrumentation boundary: uniform timing and counting for synchronous
//! calls and for futures.
//!
//! Call sites (or whatever wraps them) pick the entry point statically:
//! `exit_sync` for a plain return, `attach_async_completion` for a future.

mod call;
mod hooks;
mod wrap;

pub use call::{CallInfo, CallSite, Measures, PendingCall};
pub use hooks::{CompletionHooks, FlowDecision, HookChain, Terminal};
pub use wrap::InstrumentationBoundary;
