//! Multi-turn conversation module
//!
//! A [`ConversationSession`] owns one provider-side conversation handle.
//! [`Dialogue`] runs the local turn loop for the CLI and batch runners, and
//! [`SessionStore`] keeps one session per dialogue for the HTTP server.

mod dialogue;
mod session;
mod store;

pub use dialogue::{Dialogue, ExitSentinel};
pub use session::{ConversationSession, Turn};
pub use store::{SessionStore, SharedSession};
