//! The `[general]` table of `bfm.toml`.

use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_KEY_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_STATUS_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_PREVIEW_MAX_BYTES: usize = 1024 * 1024;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct General {
    key_timeout_ms: u64,
    status_timeout_ms: u64,
    preview_max_bytes: usize,
}

impl Default for General {
    fn default() -> Self {
        General {
            key_timeout_ms: DEFAULT_KEY_TIMEOUT_MS,
            status_timeout_ms: DEFAULT_STATUS_TIMEOUT_MS,
            preview_max_bytes: DEFAULT_PREVIEW_MAX_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalGeneral {
    key_timeout: Duration,
    status_timeout: Duration,
    preview_max_bytes: usize,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        Self {
            key_timeout: Duration::from_millis(g.key_timeout_ms),
            status_timeout: Duration::from_millis(g.status_timeout_ms),
            // never zero
            preview_max_bytes: g.preview_max_bytes.max(1),
        }
    }
}

impl InternalGeneral {
    /// How long a partial key sequence waits for the next key.
    #[inline]
    pub fn key_timeout(&self) -> Duration {
        self.key_timeout
    }

    /// How long an info message stays in the footer.
    #[inline]
    pub fn status_timeout(&self) -> Duration {
        self.status_timeout
    }

    #[inline]
    pub fn preview_max_bytes(&self) -> usize {
        self.preview_max_bytes
    }
}
