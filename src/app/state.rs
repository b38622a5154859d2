//! Application State and main controller module for bfm.
//!
//! This module defines the overall [AppState] struct, which holds all major application
//! information and passes it to relevant UI/Terminal functions
//! - Configuration and the command registry, both borrowed from `main`
//! - The key sequence resolver
//! - The folder controller, the preview manager and the item mutator
//! - Prompt state and the status message
//!
//! Key presses come in through [AppState::handle_keypress], timers and preview output
//! through [AppState::tick]. Both run on the event loop thread and run to completion.

use crate::app::actions::ActionContext;
use crate::app::folder::{FolderController, FolderEvent, Refocus};
use crate::app::keymap::{CommandRegistry, WidgetClass, key_token};
use crate::app::preview::PreviewManager;
use crate::app::resolver::{KeySequenceResolver, Resolution};
use crate::config::Config;
use crate::core::ItemMutator;

use crossterm::event::KeyEvent;

use std::fmt::Display;
use std::path::Path;
use std::time::Instant;

/// Enumeration for each individual keypress result processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypressResult {
    /// Nothing was bound to the key.
    Continue,
    Consumed,
    Quit,
    /// The screen was handed to another program and needs a full redraw.
    OpenedEditor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A message in the footer.
///
/// Info messages expire after the configured timeout, errors stay until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    text: String,
    severity: Severity,
    expires: Option<Instant>,
}

impl Status {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

const ITEM_CHAIN: &[WidgetClass] = &[WidgetClass::Item, WidgetClass::Folder, WidgetClass::Root];
const FOLDER_CHAIN: &[WidgetClass] = &[WidgetClass::Folder, WidgetClass::Root];

pub struct AppState<'a> {
    pub(super) config: &'a Config,
    pub(super) registry: &'a CommandRegistry,
    pub(super) resolver: KeySequenceResolver,

    pub(super) folder: FolderController,
    pub(super) preview: PreviewManager,
    pub(super) mutator: ItemMutator,
    pub(super) actions: ActionContext,

    pub(super) status: Option<Status>,
}

impl<'a> AppState<'a> {
    /// State browsing `initial_path`. A failed first scan shows up as a status error.
    pub fn from_dir(config: &'a Config, registry: &'a CommandRegistry, initial_path: &Path) -> Self {
        let mut app = Self {
            config,
            registry,
            resolver: KeySequenceResolver::new(config.general().key_timeout()),
            folder: FolderController::new(initial_path.to_path_buf()),
            preview: PreviewManager::from_config(config),
            mutator: ItemMutator::default(),
            actions: ActionContext::default(),
            status: None,
        };
        app.refresh(Refocus::Restore);
        app
    }

    /// Replaces the mutator, e.g. to use another trash backend.
    pub fn with_mutator(mut self, mutator: ItemMutator) -> Self {
        self.mutator = mutator;
        self
    }

    // Getters/ accessors

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[inline]
    pub fn folder(&self) -> &FolderController {
        &self.folder
    }

    #[inline]
    pub fn preview(&self) -> &PreviewManager {
        &self.preview
    }

    #[inline]
    pub fn actions(&self) -> &ActionContext {
        &self.actions
    }

    #[inline]
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Keys typed so far of an unfinished sequence.
    #[inline]
    pub fn pending_keys(&self) -> &str {
        self.resolver.pending()
    }

    /// Widget classes that see a key, innermost first. Without a focused entry there is
    /// no item widget.
    pub fn focus_chain(&self) -> &'static [WidgetClass] {
        if self.folder.focused().is_some() {
            ITEM_CHAIN
        } else {
            FOLDER_CHAIN
        }
    }

    /// Expires timers and pulls preview output.
    ///
    /// Is used by the main event loop once per iteration.
    /// Returns true if something visible changed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// [tick](Self::tick) as if it ran at `now`.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(status) = &self.status
            && status.expires.is_some_and(|at| now >= at)
        {
            self.status = None;
            changed = true;
        }

        changed |= self.resolver.expire(now);
        changed |= self.preview.pump();
        changed
    }

    /// Central key handler.
    pub fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        if self
            .status
            .as_ref()
            .is_some_and(|s| s.severity == Severity::Error)
        {
            self.status = None;
        }

        if self.actions.is_input_mode() {
            return self.handle_input_mode(key);
        }

        let Some(token) = key_token(&key) else {
            return KeypressResult::Continue;
        };
        self.handle_token(&token)
    }

    /// Feeds one key token to the resolver and runs the command it completes.
    pub fn handle_token(&mut self, token: &str) -> KeypressResult {
        let chain = self.focus_chain();
        match self.resolver.resolve(token, chain, self.registry) {
            Resolution::Consumed(command) => self.dispatch(command),
            Resolution::Pending => KeypressResult::Consumed,
            Resolution::Rejected => KeypressResult::Continue,
        }
    }

    // Status messages

    pub fn set_status_info(&mut self, text: impl Into<String>) {
        let expires = Instant::now() + self.config.general().status_timeout();
        self.status = Some(Status {
            text: text.into(),
            severity: Severity::Info,
            expires: Some(expires),
        });
    }

    pub fn set_status_error(&mut self, err: impl Display) {
        let text = err.to_string();
        tracing::info!(%text, "status error");
        self.status = Some(Status {
            text,
            severity: Severity::Error,
            expires: None,
        });
    }

    // Folder plumbing

    /// Rescans the folder, reporting a scan failure in the footer.
    pub(crate) fn refresh(&mut self, refocus: Refocus) {
        if let Err(err) = self.folder.refresh(refocus) {
            self.set_status_error(err);
        }
        self.sync_folder_events();
    }

    /// Forwards queued folder events. The preview restarts once for the final focus.
    pub(crate) fn sync_folder_events(&mut self) {
        let mut focus_changed = false;
        for event in self.folder.drain_events() {
            match event {
                FolderEvent::PathChanged { old, new } => {
                    tracing::debug!(old = %old.display(), new = %new.display(), "path changed");
                }
                FolderEvent::FocusChanged(_) => focus_changed = true,
            }
        }
        if focus_changed {
            self.preview.on_focus_changed(self.folder.focused());
        }
    }
}
