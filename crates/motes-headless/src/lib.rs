//! Headless implementations of the platform traits: frames go to the log or
//! to a JSON-lines file instead of a window.

mod clock;
mod record;
mod trace;

pub use clock::{IntervalClock, Unpaced};
pub use record::JsonLinesRenderer;
pub use trace::TraceRenderer;
