//! UI Components
//!
//! Reusable components shared across pages.

pub mod chat;
pub mod confirm;
pub mod loading;
pub mod member_editor;
pub mod nav;
pub mod toast;

pub use chat::ChatWidget;
pub use confirm::ConfirmDialog;
pub use loading::{CardSkeleton, ListSkeleton, Loading};
pub use member_editor::MemberEditorPanel;
pub use nav::Nav;
pub use toast::Toast;
