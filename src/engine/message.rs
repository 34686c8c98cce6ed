//! Bounded Message Formatting
//!
//! Log text handed over by the SUPL engine is formatted into a buffer of
//! fixed capacity. Capacity counts a terminator slot, so at most
//! `capacity - 1` bytes of text are kept. Output that does not fit is cut
//! at the last whole character and flagged; the untruncated length is still
//! reported.

use std::fmt::{self, Write};
use thiserror::Error;

/// Formatting failures of the log callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A formatting implementation reported an error
    #[error("encoding error")]
    Encoding,
}

/// Formatted message and the length it needed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMessage {
    pub text: String,
    /// Bytes the full message needed, regardless of capacity
    pub required: usize,
}

impl FormattedMessage {
    /// Whether `text` is shorter than the full message
    pub fn is_truncated(&self) -> bool {
        self.required > self.text.len()
    }
}

/// Capacity-bounded `fmt::Write` target
#[derive(Debug)]
pub struct MessageBuffer {
    text: String,
    limit: usize,
    required: usize,
    full: bool,
}

impl MessageBuffer {
    pub fn new(capacity: usize) -> Self {
        let limit = capacity.saturating_sub(1);
        Self {
            text: String::with_capacity(limit),
            limit,
            required: 0,
            full: false,
        }
    }

    /// Format `args` into a buffer of `capacity` bytes
    pub fn format(capacity: usize, args: fmt::Arguments<'_>) -> Result<FormattedMessage, FormatError> {
        let mut buffer = Self::new(capacity);
        buffer.write_fmt(args).map_err(|_| FormatError::Encoding)?;
        Ok(buffer.finish())
    }

    pub fn finish(self) -> FormattedMessage {
        FormattedMessage {
            text: self.text,
            required: self.required,
        }
    }
}

impl Write for MessageBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.required += s.len();
        if self.full {
            return Ok(());
        }

        let room = self.limit - self.text.len();
        if s.len() <= room {
            self.text.push_str(s);
        } else {
            let mut cut = room;
            while !s.is_char_boundary(cut) {
                cut -= 1;
            }
            self.text.push_str(&s[..cut]);
            self.full = true;
        }
        Ok(())
    }
}
