//! Client library for the [Habitica](https://habitica.com) v3 API.
//!
//! [`Habitica`] is the entry point: it owns an authenticated
//! [`Connection`] and exposes raw verb methods plus typed helpers for
//! each resource group (account, tasks, tags, chat, content, user).
//! Every failed request resolves to one of the [`Error`] variants, so
//! callers can tell a server-reported error from a dead connection by
//! matching on the kind.

mod client;
mod connection;
mod error;
pub mod http;
mod resources;

pub use client::Habitica;
pub use connection::{
    Connection, ConnectionOptions, OptionsUpdate, Query, RequestOptions, Session, Setting,
};
pub use error::{Error, Result};
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
pub use resources::{Account, Chat, Content, ScoreDirection, Tags, Tasks, Users};
