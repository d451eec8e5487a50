use std::time::{Duration, Instant};

pub trait ClipboardWriter {
    /// Returns whether the host accepted the write. Callers do not surface
    /// the difference beyond the acknowledgment.
    fn write_text(&mut self, text: &str) -> bool;
}

impl<T: ClipboardWriter + ?Sized> ClipboardWriter for &mut T {
    fn write_text(&mut self, text: &str) -> bool {
        (**self).write_text(text)
    }
}

/// The desktop clipboard.
#[derive(Default)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> bool {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(text) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(error = %err, "clipboard write rejected");
                    false
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "clipboard unavailable");
                false
            }
        }
    }
}

/// Transient "copied" acknowledgment that reverts on its own.
#[derive(Clone, Debug)]
pub struct CopyAck {
    ttl: Duration,
    since: Option<Instant>,
}

impl CopyAck {
    pub fn new(ttl: Duration) -> Self {
        CopyAck { ttl, since: None }
    }

    pub fn mark(&mut self, now: Instant) {
        self.since = Some(now);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.since
            .is_some_and(|since| now.saturating_duration_since(since) < self.ttl)
    }

    pub fn clear(&mut self) {
        self.since = None;
    }
}

/// Copy `text` and raise the acknowledgment if the host took it.
pub fn copy_with_ack<C: ClipboardWriter + ?Sized>(
    clipboard: &mut C,
    ack: &mut CopyAck,
    text: &str,
    now: Instant,
) -> bool {
    let ok = clipboard.write_text(text);
    if ok {
        ack.mark(now);
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rejecting;

    impl ClipboardWriter for Rejecting {
        fn write_text(&mut self, _text: &str) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct Memory(Vec<String>);

    impl ClipboardWriter for Memory {
        fn write_text(&mut self, text: &str) -> bool {
            self.0.push(text.to_string());
            true
        }
    }

    #[test]
    fn ack_reverts_after_ttl() {
        let t0 = Instant::now();
        let mut ack = CopyAck::new(Duration::from_millis(2000));
        assert!(!ack.is_active(t0));

        let mut mem = Memory::default();
        assert!(copy_with_ack(&mut mem, &mut ack, "https://x/?sender=A", t0));
        assert_eq!(mem.0, vec!["https://x/?sender=A".to_string()]);
        assert!(ack.is_active(t0 + Duration::from_millis(1999)));
        assert!(!ack.is_active(t0 + Duration::from_millis(2000)));

        ack.mark(t0);
        ack.clear();
        assert!(!ack.is_active(t0));
    }

    #[test]
    fn rejected_write_is_absorbed() {
        let t0 = Instant::now();
        let mut ack = CopyAck::new(Duration::from_secs(2));
        assert!(!copy_with_ack(&mut Rejecting, &mut ack, "x", t0));
        assert!(!ack.is_active(t0));
    }
}
