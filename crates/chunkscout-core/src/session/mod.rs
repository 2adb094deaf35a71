//! The chunk exploration session: state, phase machine, and controller.

pub mod controller;
pub mod phase;
pub mod state;

pub use controller::SessionController;
pub use phase::SessionPhase;
pub use state::SessionState;
