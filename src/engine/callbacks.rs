//! SUPL Engine Callbacks
//!
//! The SUPL session engine drives its transport through three callbacks
//! reporting plain signed integers: a byte count, `0` for "nothing yet",
//! or a negative value for failure. This module maps the typed connection
//! API onto that shape.

use std::fmt;

use tracing::debug;

use super::message::MessageBuffer;
use crate::connection::{Network, ReadOutcome, SuplConnection};
use crate::diagnostics::DiagnosticSink;

/// Value returned to the engine for any failure
pub const ENGINE_ERROR: isize = -1;

/// Callback surface consumed by a SUPL session engine
pub trait SuplCallbacks {
    /// Send `buf`; returns the count of one send call or [`ENGINE_ERROR`]
    fn write(&mut self, buf: &[u8]) -> isize;

    /// Receive into `buf`; returns the count, `0` when the read timeout
    /// expired without data, or [`ENGINE_ERROR`]
    fn read(&mut self, buf: &mut [u8]) -> isize;

    /// Emit an engine log line. `level` is accepted but not used for
    /// filtering. Returns the untruncated message length or a negative
    /// value on formatting failure.
    fn log(&mut self, level: i32, args: fmt::Arguments<'_>) -> i32;
}

impl<N: Network, S: DiagnosticSink> SuplCallbacks for SuplConnection<N, S> {
    fn write(&mut self, buf: &[u8]) -> isize {
        match SuplConnection::write(self, buf) {
            Ok(n) => count(n),
            Err(e) => {
                debug!("SUPL write failed: {}", e);
                ENGINE_ERROR
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> isize {
        match SuplConnection::read(self, buf) {
            Ok(ReadOutcome::Data(n)) => count(n),
            Ok(ReadOutcome::Timeout) => 0,
            Err(e) => {
                debug!("SUPL read failed: {}", e);
                ENGINE_ERROR
            }
        }
    }

    fn log(&mut self, _level: i32, args: fmt::Arguments<'_>) -> i32 {
        log_message(self.sink(), self.message_capacity(), args)
    }
}

/// Format `args` into a `capacity`-byte buffer and print it to `sink`
pub fn log_message<S: DiagnosticSink + ?Sized>(
    sink: &S,
    capacity: usize,
    args: fmt::Arguments<'_>,
) -> i32 {
    let message = match MessageBuffer::format(capacity, args) {
        Ok(message) => message,
        Err(e) => {
            sink.error(&format!("log_message: {}", e));
            return ENGINE_ERROR as i32;
        }
    };

    if message.is_truncated() {
        sink.error("log_message: too long message, it will be cut short");
    }
    sink.print(&message.text);

    i32::try_from(message.required).unwrap_or(i32::MAX)
}

fn count(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}
