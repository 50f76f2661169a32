//! Application services for the task board.

mod board;
mod feedback;
mod leaderboard;
mod posting;
mod selection;

pub use board::{ActionHint, BoardError, BoardResult, TaskBoard, UpdatePolicy};
pub use feedback::{ErrorKind, Feedback, InlineMessage};
pub use leaderboard::{
    Leaderboard, RANKING_LIMIT, RECENT_COMPLETIONS_LIMIT, Standing, recent_completions,
    top_earners, top_posters,
};
pub use posting::{EscrowFunding, FundingError, PostTaskRequest};
pub use selection::{FixtureFallback, SelectionError, select_gateway};
