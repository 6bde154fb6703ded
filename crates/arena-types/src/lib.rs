//! Shared type definitions for the arena.
//!
//! This crate is the single source of truth for every type that crosses
//! the wire. Types defined here flow downstream to `TypeScript` via `ts-rs`
//! for the web client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for players and series
//! - [`enums`] -- Marks, cells and round outcomes
//! - [`structs`] -- Score and the public series/round views
//! - [`messages`] -- Request and response payloads

pub mod enums;
pub mod ids;
pub mod messages;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Cell, Mark, Outcome};
pub use ids::{PlayerId, SeriesId};
pub use messages::{
    DeleteResponse, FindResponse, HealthResponse, JoinRequest, JoinResponse, MoveRequest,
    MoveResponse,
};
pub use structs::{MatchView, Score, SeriesView};
