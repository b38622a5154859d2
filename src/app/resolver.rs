//! Multi-key sequence resolution.
//!
//! [KeySequenceResolver] buffers key tokens until they form a bound sequence in one of the
//! tables of the focus chain, a prefix of some known sequence, or nothing at all.
//! A pending sequence is dropped after an inactivity timeout.

use crate::app::keymap::{Command, CommandRegistry, WidgetClass};

use std::time::{Duration, Instant};

/// Result of feeding one token to the resolver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The buffered sequence matched a binding. The buffer is empty again.
    Consumed(Command),
    /// The buffer is a strict prefix of some binding and waits for more keys.
    Pending,
    /// No binding starts with the buffer. The buffer is empty again.
    Rejected,
}

pub const ESCAPE_TOKEN: &str = "<esc>";

#[derive(Debug)]
pub struct KeySequenceResolver {
    pending: String,
    deadline: Option<Instant>,
    timeout: Duration,
}

impl KeySequenceResolver {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: String::new(),
            deadline: None,
            timeout,
        }
    }

    #[inline]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadline = None;
    }

    pub fn resolve(
        &mut self,
        token: &str,
        chain: &[WidgetClass],
        registry: &CommandRegistry,
    ) -> Resolution {
        self.resolve_at(token, chain, registry, Instant::now())
    }

    /// Feeds `token` as if it was pressed at `now`.
    ///
    /// `chain` lists the widget classes to consult, innermost first. Each table applies
    /// its own aliases before the lookup. The prefix check covers every table.
    pub fn resolve_at(
        &mut self,
        token: &str,
        chain: &[WidgetClass],
        registry: &CommandRegistry,
        now: Instant,
    ) -> Resolution {
        self.expire(now);

        if token == ESCAPE_TOKEN {
            self.clear();
            return Resolution::Rejected;
        }

        self.pending.push_str(token);

        let hit = chain
            .iter()
            .find_map(|&class| registry.table(class).lookup(&self.pending));
        if let Some(command) = hit {
            self.clear();
            return Resolution::Consumed(command);
        }

        let waits = registry.is_strict_prefix(&self.pending)
            || chain.iter().any(|&class| {
                let canonical = registry.table(class).canonical(&self.pending);
                registry.is_strict_prefix(canonical)
            });
        if waits {
            self.deadline = Some(now + self.timeout);
            return Resolution::Pending;
        }

        self.clear();
        Resolution::Rejected
    }

    /// Drops a pending sequence whose deadline has passed. Returns true if it did.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                tracing::debug!(pending = %self.pending, "key sequence timed out");
                self.clear();
                true
            }
            _ => false,
        }
    }
}
