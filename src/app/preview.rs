//! Streaming preview of the focused entry.
//!
//! [PreviewManager] runs at most one preview command at a time. A focus change terminates
//! the running command's process group, clears the buffer and starts the next command.
//! Output is pulled from a non-blocking pipe by [PreviewManager::pump] on every tick, so
//! partial output shows up while the command is still running.

use crate::config::Config;
use crate::core::formatter::metadata_line;
use crate::core::proc::{GroupProcess, PipeState, spawn_piped};
use crate::core::DirectoryEntry;
use crate::utils::expand_template;

use ansi_to_tui::IntoText;
use ratatui::text::Text;
use std::path::{Path, PathBuf};
use std::process::Child;

/// Bytes read from the pipe per pump.
const PUMP_BUDGET: usize = 64 * 1024;

pub struct PreviewManager {
    file_command: String,
    folder_command: String,
    max_bytes: usize,
    active: Option<GroupProcess>,
    retired: Vec<Child>,
    buffer: Vec<u8>,
    text: Text<'static>,
    metadata: String,
    target: Option<PathBuf>,
    generation: u64,
    truncated: bool,
}

impl PreviewManager {
    pub fn new(file_command: &str, folder_command: &str, max_bytes: usize) -> Self {
        Self {
            file_command: file_command.to_string(),
            folder_command: folder_command.to_string(),
            max_bytes,
            active: None,
            retired: Vec::new(),
            buffer: Vec::new(),
            text: Text::default(),
            metadata: String::new(),
            target: None,
            generation: 0,
            truncated: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let commands = config.commands();
        Self::new(
            commands.file_preview(),
            commands.folder_preview(),
            config.general().preview_max_bytes(),
        )
    }

    // Accessors

    #[inline]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// The buffer with ANSI colors parsed.
    #[inline]
    pub fn text(&self) -> &Text<'static> {
        &self.text
    }

    #[inline]
    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    #[inline]
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// Incremented on every focus change.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Restarts the preview for `entry`, or clears it for `None`.
    ///
    /// The metadata line is filled in right away. Output of the previous command never
    /// reaches the new buffer since its pipe is dropped with it.
    pub fn on_focus_changed(&mut self, entry: Option<&DirectoryEntry>) {
        self.stop();
        self.generation = self.generation.wrapping_add(1);
        self.buffer.clear();
        self.text = Text::default();
        self.truncated = false;

        let Some(entry) = entry else {
            self.metadata.clear();
            self.target = None;
            return;
        };

        self.metadata = metadata_line(entry);
        self.target = Some(entry.path().to_path_buf());

        let template = if entry.is_real_dir() {
            &self.folder_command
        } else {
            &self.file_command
        };
        let command = expand_template(template, entry.path());
        let cwd = entry.path().parent().unwrap_or(Path::new("/"));

        match spawn_piped(&command, cwd) {
            Ok(process) => self.active = Some(process),
            Err(err) => {
                tracing::warn!(%command, %err, "could not start preview");
            }
        }
    }

    /// Reads whatever output is ready and reaps finished commands.
    ///
    /// Returns true if the buffer grew.
    pub fn pump(&mut self) -> bool {
        self.retired
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));

        let Some(process) = self.active.as_mut() else {
            return false;
        };

        let before = self.buffer.len();
        let room = self.max_bytes.saturating_sub(before);
        let state = process.read_available(&mut self.buffer, room.min(PUMP_BUDGET));
        let grew = self.buffer.len() > before;

        match state {
            Ok(PipeState::Closed) => self.stop(),
            Ok(PipeState::Open) if self.buffer.len() >= self.max_bytes => {
                tracing::debug!(max = self.max_bytes, "preview output capped");
                self.truncated = true;
                self.stop();
            }
            Ok(PipeState::Open) => {}
            Err(err) => {
                tracing::warn!(%err, "reading preview output failed");
                self.stop();
            }
        }

        if grew {
            self.text = self
                .buffer
                .into_text()
                .unwrap_or_else(|_| Text::from(String::from_utf8_lossy(&self.buffer).into_owned()));
        }
        grew
    }

    /// Signals the running command's group without waiting for it.
    pub fn stop(&mut self) {
        if let Some(process) = self.active.take() {
            tracing::debug!(pid = process.id(), "stopping preview");
            if let Some(child) = process.terminate() {
                self.retired.push(child);
            }
        }
    }

    pub fn clear(&mut self) {
        self.on_focus_changed(None);
    }
}

impl Drop for PreviewManager {
    fn drop(&mut self) {
        self.stop();
    }
}
