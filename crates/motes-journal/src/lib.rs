//! Append-only JSON memory log and the line-oriented console that feeds it.

mod command;
mod error;
mod log;
mod session;

pub use command::{Command, CORE_CATEGORY, USAGE_LEARN};
pub use error::{JournalError, Result};
pub use log::{MemoryLog, MemoryRecord, Meta, DEFAULT_PATH};
pub use session::{Session, SessionEnd};
