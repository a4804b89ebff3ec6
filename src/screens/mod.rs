// Markshelf screen state
// Dialog state machines and the per-screen view state that drives them.

pub mod bookmark_screen;
pub mod browse_screen;
pub mod drafts;
pub mod edit_dialog;

pub use bookmark_screen::BookmarkScreen;
pub use browse_screen::BrowseScreen;
pub use drafts::{BookmarkDraft, CategoryDraft, NewBookmarkDraft};
pub use edit_dialog::{DialogMessage, DialogState, Draft, EditDialog, SaveOutcome, SaveTicket, Submit};
