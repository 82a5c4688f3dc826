mod session;
mod state;

pub use session::{Comparison, Direction, Move, Session};
pub use state::{App, OverlayData};
