//! Topic-based event bus for battle events.
//!
//! Events are published to specific topics, and consumers can subscribe only
//! to the topics they need. An additional all-events stream preserves the
//! engine's emission order across topics.

mod bus;

pub use bus::{Event, EventBus, Topic};
