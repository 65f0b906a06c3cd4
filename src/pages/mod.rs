//! Page Components
//!
//! One module per routed page.

pub mod admin;
pub mod complete;
pub mod event_detail;
pub mod events;
pub mod login;
pub mod summary;

pub use admin::Admin;
pub use complete::Complete;
pub use event_detail::EventDetail;
pub use events::Events;
pub use login::Login;
pub use summary::Summary;
