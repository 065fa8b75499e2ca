//! Resource-group facades.
//!
//! Each struct wraps the shared [`Connection`](crate::Connection) and
//! adds nothing beyond path construction, argument validation, and
//! unwrapping of the v3 `{success, data, ...}` response envelope.

mod account;
mod chat;
mod content;
mod tag;
mod task;
mod user;

pub use account::Account;
pub use chat::Chat;
pub use content::Content;
pub use tag::Tags;
pub use task::{ScoreDirection, Tasks};
pub use user::Users;

use serde_json::Value;

/// Unwraps the response envelope, returning the body itself when no
/// `data` field is present (some historical endpoints respond bare).
pub(crate) fn take_data(mut body: Value) -> Value {
    match body.get_mut("data") {
        Some(data) => data.take(),
        None => body,
    }
}
