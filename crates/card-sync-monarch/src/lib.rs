//! Monarch Money as a [`card_sync::ledger::Ledger`].
//!
//! Talks to the same GraphQL endpoint and operations as the Monarch web app,
//! authenticated with the web session token. No retries.

mod client;
mod queries;
mod wire;

pub use client::{DEFAULT_API_URL, MonarchClient};
