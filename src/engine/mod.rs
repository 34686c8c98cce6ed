//! SUPL Engine Adapter Module
//!
//! Write, read and log callbacks in the form a SUPL session engine
//! consumes them.

pub mod callbacks;
pub mod message;

pub use callbacks::{log_message, SuplCallbacks, ENGINE_ERROR};
pub use message::{FormatError, FormattedMessage, MessageBuffer};

/// Default log buffer size, terminator slot included
pub const DEFAULT_MESSAGE_CAPACITY: usize = 256;
