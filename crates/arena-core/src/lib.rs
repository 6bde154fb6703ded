//! Matchmaking and match lifecycle engine for the tic-tac-toe arena.
//!
//! This crate owns everything with state or timing: pairing anonymous
//! players, the best-of-N series state machine, move validation and win
//! detection, the delayed advance to the next round, and retention.
//!
//! # Modules
//!
//! - [`board`] -- Pure board engine: apply a move, evaluate, find the
//!   winning line.
//! - [`series`] -- [`Series`] and [`Round`] state machines.
//! - [`registry`] -- [`MatchRegistry`], the live series keyed by ID.
//! - [`queue`] -- [`MatchmakingQueue`], FIFO pairing with freshness.
//! - [`scheduler`] -- [`RoundScheduler`], cancellable delayed advances.
//! - [`janitor`] -- Periodic retention sweep task.
//! - [`arena`] -- [`Arena`], the facade the HTTP layer calls.
//! - [`clock`] -- Injectable time source.
//! - [`config`] -- Configuration loading from `arena-config.yaml`.
//! - [`error`] -- [`ArenaError`].
//!
//! [`Series`]: series::Series
//! [`Round`]: series::Round
//! [`MatchRegistry`]: registry::MatchRegistry
//! [`MatchmakingQueue`]: queue::MatchmakingQueue
//! [`RoundScheduler`]: scheduler::RoundScheduler
//! [`Arena`]: arena::Arena
//! [`ArenaError`]: error::ArenaError

pub mod arena;
pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod janitor;
pub mod queue;
pub mod registry;
pub mod scheduler;
pub mod series;

pub use arena::Arena;
pub use config::ArenaConfig;
pub use error::ArenaError;
