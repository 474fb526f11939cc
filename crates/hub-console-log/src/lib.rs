pub mod filter;
pub mod session;
pub mod state;

pub use filter::FilterState;
pub use session::ConsoleSession;
pub use state::{ConsoleChange, ConsoleLogHub, OnChangeFn};
