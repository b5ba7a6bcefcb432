//! Recording session management
//!
//! This module provides the `SessionController` that manages:
//! - The `Idle → Recording → Processing → Idle` cycle
//! - The busy guard (one recording/upload cycle in flight, no queuing)
//! - Result and error publication for the presentation layer

mod controller;
mod state;

pub use controller::SessionController;
pub use state::{SessionError, SessionFailure, SessionPhase, SessionSnapshot};
