//! Game-agnostic contracts shared by the frame host and the games it drives.

pub mod envelope;
pub mod game;
pub mod time;
pub mod types;

pub use envelope::ActionEnvelope;
pub use game::{Game, TerminalOutcome};
pub use time::FrameDelta;
pub use types::{ActionId, Tick};
