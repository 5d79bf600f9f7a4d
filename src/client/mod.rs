//! Client-side session handling: the local key-value state that browsers
//! keep, and the manager that reconciles it with the server at sign-in and
//! sign-up time.

pub mod api;
pub mod session;
pub mod store;

pub use session::SessionManager;
pub use store::{GuestEntry, LocalState, MemoryStore, SessionStore};
