//! Moodify: mood-matched music, backed by a small REST API.
//!
//! The binary serves the Auth and History services over PostgreSQL; the
//! [`client`] module holds the session manager and local guest-history
//! state that browsers (or headless embeddings) keep, and [`inference`]
//! the contract of the external emotion-classification collaborators.

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod inference;
pub mod state;
