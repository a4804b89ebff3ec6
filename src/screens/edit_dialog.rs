//! Generic edit dialog state machine.
//!
//! `Closed -> Editing -> Saving -> Closed | Editing(message)`. A dialog holds
//! only its own draft and never writes to storage directly: `begin_save`
//! hands out a [`SaveTicket`] whose request the caller submits to the engine,
//! and `complete` folds the outcome back in.

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::managers::BookmarkEngine;
use crate::types::errors::{EngineError, SaveBookmarkResult};

/// User-visible message shown inline in an open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMessage {
    AlreadyRegistered,
    SaveFailed,
}

impl fmt::Display for DialogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogMessage::AlreadyRegistered => write!(f, "すでに登録されています"),
            DialogMessage::SaveFailed => write!(f, "保存に失敗しました"),
        }
    }
}

/// Result of submitting a dialog's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(DialogMessage),
}

impl From<SaveBookmarkResult> for SaveOutcome {
    fn from(result: SaveBookmarkResult) -> Self {
        match result {
            SaveBookmarkResult::Success => SaveOutcome::Saved,
            SaveBookmarkResult::Duplicate => SaveOutcome::Failed(DialogMessage::AlreadyRegistered),
            SaveBookmarkResult::Invalid | SaveBookmarkResult::Storage(_) => {
                SaveOutcome::Failed(DialogMessage::SaveFailed)
            }
        }
    }
}

impl<T> From<Result<T, EngineError>> for SaveOutcome {
    fn from(result: Result<T, EngineError>) -> Self {
        match result {
            Ok(_) => SaveOutcome::Saved,
            Err(_) => SaveOutcome::Failed(DialogMessage::SaveFailed),
        }
    }
}

/// A validated mutation ready to be sent to the engine.
#[async_trait]
pub trait Submit: Send {
    async fn submit(self, engine: &BookmarkEngine) -> SaveOutcome;
}

/// An in-progress edit buffer.
pub trait Draft: Clone {
    type Request: Submit;

    /// Builds the request to submit, applying field defaults. `None` means a
    /// required field is blank and the save is abandoned locally.
    fn prepare(&self) -> Option<Self::Request>;
}

/// Identifies one save attempt of one dialog.
pub type TicketId = u64;

/// Handed out by [`EditDialog::begin_save`].
#[derive(Debug)]
pub struct SaveTicket<R> {
    pub id: TicketId,
    pub request: R,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogState<D> {
    Closed,
    Editing {
        draft: D,
        message: Option<DialogMessage>,
    },
    Saving {
        draft: D,
        ticket: TicketId,
    },
}

/// One dialog instance. At most one save is in flight at a time.
#[derive(Debug, Clone)]
pub struct EditDialog<D> {
    state: DialogState<D>,
    next_ticket: TicketId,
}

impl<D: Draft> EditDialog<D> {
    pub fn new() -> Self {
        Self {
            state: DialogState::Closed,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> &DialogState<D> {
        &self.state
    }

    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            DialogState::Closed => None,
            DialogState::Editing { draft, .. } | DialogState::Saving { draft, .. } => Some(draft),
        }
    }

    pub fn message(&self) -> Option<DialogMessage> {
        match &self.state {
            DialogState::Editing { message, .. } => *message,
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, DialogState::Closed)
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.state, DialogState::Saving { .. })
    }

    /// Opens the dialog on `draft`, replacing any previous draft.
    ///
    /// A save still in flight for the replaced draft will be dropped when it
    /// completes.
    pub fn start(&mut self, draft: D) {
        self.state = DialogState::Editing {
            draft,
            message: None,
        };
    }

    /// Edits the draft in place. Ignored unless editing.
    pub fn update(&mut self, edit: impl FnOnce(&mut D)) {
        if let DialogState::Editing { draft, .. } = &mut self.state {
            edit(draft);
        }
    }

    /// Shows `message` in an editing dialog.
    pub fn set_message(&mut self, message: Option<DialogMessage>) {
        if let DialogState::Editing { message: current, .. } = &mut self.state {
            *current = message;
        }
    }

    /// Moves an editing dialog to `Saving` and returns the request to submit.
    ///
    /// Returns `None` if the dialog is closed, already saving, or the draft
    /// is missing a required field.
    pub fn begin_save(&mut self) -> Option<SaveTicket<D::Request>> {
        let request = match &self.state {
            DialogState::Editing { draft, .. } => draft.prepare()?,
            DialogState::Saving { ticket, .. } => {
                debug!(ticket, "save already in flight");
                return None;
            }
            DialogState::Closed => return None,
        };
        let DialogState::Editing { draft, .. } = std::mem::replace(&mut self.state, DialogState::Closed) else {
            return None;
        };
        self.next_ticket += 1;
        let id = self.next_ticket;
        self.state = DialogState::Saving { draft, ticket: id };
        Some(SaveTicket { id, request })
    }

    /// Applies the outcome of the save identified by `ticket`.
    ///
    /// Returns `false` and drops the outcome if the dialog was dismissed or
    /// restarted since the save began.
    pub fn complete(&mut self, ticket: TicketId, outcome: SaveOutcome) -> bool {
        match &self.state {
            DialogState::Saving { ticket: current, .. } if *current == ticket => {}
            _ => {
                debug!(ticket, "dropping result of abandoned save");
                return false;
            }
        }
        let DialogState::Saving { draft, .. } = std::mem::replace(&mut self.state, DialogState::Closed) else {
            return false;
        };
        if let SaveOutcome::Failed(message) = outcome {
            self.state = DialogState::Editing {
                draft,
                message: Some(message),
            };
        }
        true
    }

    /// Closes the dialog and discards the draft.
    pub fn dismiss(&mut self) {
        self.state = DialogState::Closed;
    }

    /// Runs a whole save against `engine`. Returns `true` if the dialog closed.
    pub async fn save(&mut self, engine: &BookmarkEngine) -> bool {
        let Some(SaveTicket { id, request }) = self.begin_save() else {
            return false;
        };
        let outcome = request.submit(engine).await;
        self.complete(id, outcome) && !self.is_open()
    }
}

impl<D: Draft> Default for EditDialog<D> {
    fn default() -> Self {
        Self::new()
    }
}
