//! Deterministic session simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Delays counted in ticks, never wall-clock time
//! - No rendering or platform dependencies

pub mod background;
pub mod schedule;
pub mod score;
pub mod star;
pub mod state;
pub mod tick;

pub use background::{BackgroundScroller, BackgroundStrip};
pub use schedule::{Schedule, ScheduledAction};
pub use score::{MILESTONES, Milestone, ScoreTracker, milestones_crossed};
pub use star::{Star, StarManager};
pub use state::{GameEvent, GameState, RngState, SessionPhase};
pub use tick::{IDLE_REACTION_SECS, TickInput, tick};
