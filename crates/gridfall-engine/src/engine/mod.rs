//! Game engine logic and state management.
//!
//! This module provides the high-level logic that orchestrates the core data
//! structures into a playable falling-block game:
//!
//! - [`GameSession`] - The state machine: commands, tick, lock/clear/spawn,
//!   pause, reset, and the event queue
//! - [`GameStats`] - Score, level, drop-interval, and line-clear counters
//! - [`PieceSource`] - Seeded uniform piece (and tint) generation
//! - [`PieceSeed`] - Seed for deterministic sessions
//!
//! # Game Flow
//!
//! 1. Initialize a [`GameSession`] (optionally with a [`PieceSeed`])
//! 2. An external scheduler calls [`GameSession::tick`] at the cadence
//!    reported by [`GameSession::drop_interval`]
//! 3. Input collaborators call the movement/rotation commands
//! 4. A blocked downward step locks the piece, clears full rows, updates
//!    the score, and spawns the next piece
//! 5. The collaborator drains [`GameEvent`]s after each call and re-arms
//!    its timer whenever the drop interval changes
//! 6. On [`GameEvent::GameOver`] the session goes inert until
//!    [`GameSession::reset`]
//!
//! # Example
//!
//! ```
//! use gridfall_engine::GameSession;
//!
//! let mut session = GameSession::new();
//!
//! session.move_left();
//! session.rotate_cw();
//! session.tick();
//!
//! for event in session.drain_events() {
//!     println!("{event:?}");
//! }
//! ```

pub use self::{piece_source::*, session::*, stats::*};

mod piece_source;
mod session;
mod stats;
