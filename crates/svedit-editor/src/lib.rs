pub mod commands;
pub mod config;
pub mod editor;
pub mod events;
pub mod gestures;
pub mod input;
pub mod lifecycle;
pub mod session;
pub mod styling;
pub mod transaction;

pub use commands::{Command, CommandStack};
pub use config::EditorConfig;
pub use editor::Editor;
pub use events::EditorEvent;
pub use gestures::GestureController;
pub use input::{GestureEvent, GesturePhase};
pub use lifecycle::Placement;
pub use session::Session;
pub use transaction::{TransactionGuard, Transactions};
