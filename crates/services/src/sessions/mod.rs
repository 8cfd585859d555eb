mod countdown;
mod record;
mod state;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use record::SessionRecord;
pub use state::{GameState, Tick};
pub use view::{GameSnapshot, View};
pub use workflow::{SessionManager, SessionManagerBuilder};
