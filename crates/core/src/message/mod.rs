//! Single-slot transient notice shown to the user for a limited time.

use std::fmt::{self, Write as _};

use arrayvec::ArrayString;

use crate::config::MessageConfig;

/// Maximum message length in bytes. Longer messages are cut on a character
/// boundary.
pub const MESSAGE_CAPACITY: usize = 79;

/// Posts a formatted message into a [`MessageBuffer`], replacing whatever
/// was pending.
///
/// ```
/// use tracker_status_core::{post_message, MessageBuffer};
///
/// let mut messages = MessageBuffer::default();
/// post_message!(messages, "Mode: {}", "ft2");
/// assert_eq!(messages.text(), "Mode: ft2");
/// ```
#[macro_export]
macro_rules! post_message {
    ($buffer:expr, $($arg:tt)*) => {
        $buffer.post(::std::format_args!($($arg)*))
    };
}

#[derive(Debug, Clone)]
pub struct MessageBuffer {
    text: ArrayString<MESSAGE_CAPACITY>,
    remaining: u32,
    initial_countdown: u32,
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new(&MessageConfig::default())
    }
}

impl MessageBuffer {
    pub fn new(config: &MessageConfig) -> Self {
        Self {
            text: ArrayString::new(),
            remaining: 0,
            initial_countdown: config.initial_countdown,
        }
    }

    /// Replaces the pending message and restarts its countdown.
    pub fn post(&mut self, args: fmt::Arguments<'_>) {
        self.text.clear();
        let mut sink = Truncating {
            text: &mut self.text,
            full: false,
        };
        if sink.write_fmt(args).is_err() {
            tracing::trace!("message formatting failed, keeping partial text");
        }
        if sink.full {
            tracing::trace!("message truncated to {MESSAGE_CAPACITY} bytes");
        }
        self.remaining = self.initial_countdown;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Countdown left before the message expires. Decrementing it is up to
    /// the caller.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn set_remaining(&mut self, remaining: u32) {
        self.remaining = remaining;
    }

    /// Subtracts `elapsed` from the countdown, stopping at zero.
    pub fn count_down(&mut self, elapsed: u32) {
        self.remaining = self.remaining.saturating_sub(elapsed);
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// The message text while it is still live.
    pub fn current(&self) -> Option<&str> {
        (!self.is_expired()).then_some(self.text())
    }
}

/// Drops everything past the first character that does not fit.
struct Truncating<'a> {
    text: &'a mut ArrayString<MESSAGE_CAPACITY>,
    full: bool,
}

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.full {
            return Ok(());
        }
        for c in s.chars() {
            if self.text.try_push(c).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_post_wins_and_resets_countdown() {
        let mut buffer = MessageBuffer::new(&MessageConfig {
            initial_countdown: 100,
        });
        post_message!(buffer, "Pattern {:02X}", 3);
        buffer.count_down(40);
        post_message!(buffer, "Next module: {}", "dope.mod");

        assert_eq!(buffer.text(), "Next module: dope.mod");
        assert_eq!(buffer.remaining(), 100);
    }

    #[test]
    fn oversized_messages_are_truncated() {
        let mut buffer = MessageBuffer::default();
        post_message!(buffer, "{}", "x".repeat(200));

        assert_eq!(buffer.text().len(), MESSAGE_CAPACITY);
        assert!(buffer.text().chars().all(|c| c == 'x'));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut buffer = MessageBuffer::default();
        // 78 ASCII bytes leave a single byte, too small for a two-byte char.
        post_message!(buffer, "{}{}a", "y".repeat(78), '\u{e9}');

        assert_eq!(buffer.text(), "y".repeat(78));
    }

    #[test]
    fn failing_display_keeps_partial_text() {
        struct Broken;

        impl fmt::Display for Broken {
            fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let mut buffer = MessageBuffer::default();
        post_message!(buffer, "before {} after", Broken);

        assert_eq!(buffer.text(), "before ");
        assert_eq!(buffer.remaining(), MessageConfig::default().initial_countdown);
    }

    #[test]
    fn expires_when_countdown_reaches_zero() {
        let mut buffer = MessageBuffer::new(&MessageConfig {
            initial_countdown: 10,
        });
        assert!(buffer.current().is_none());

        post_message!(buffer, "Paused");
        assert_eq!(buffer.current(), Some("Paused"));

        buffer.count_down(25);
        assert!(buffer.is_expired());
        assert!(buffer.current().is_none());
        assert_eq!(buffer.text(), "Paused");
    }
}
