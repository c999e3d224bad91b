//! Deterministic match simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (fixed body slots, items by ID)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod body;
pub mod collision;
pub mod control;
pub mod modifiers;
pub mod state;
pub mod tick;

pub use ai::{AiProfile, drive_ai};
pub use body::{Body, BodyKind};
pub use collision::{CollisionReport, CollisionResult, circle_circle, resolve_all};
pub use control::{Action, SideInput, drive_human};
pub use modifiers::{ActivePowerUp, Modifiers, PowerUpItem, PowerUpKind, PowerUpSlots};
pub use state::{MatchEvent, MatchPhase, MatchState};
pub use tick::{TickInput, tick};
