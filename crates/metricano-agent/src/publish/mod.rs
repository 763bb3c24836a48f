//! Publisher contract and built-in sinks.

mod channel;
mod logging;
mod publisher;

pub use channel::ChannelPublisher;
pub use logging::LogPublisher;
pub use publisher::Publisher;
