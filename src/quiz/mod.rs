//! Quiz domain: the bulk word source, round construction, the leaderboard,
//! and the turn-taking controller that ties them to the stores.

pub mod controller;
pub mod rating;
pub mod round;
pub mod state;
pub mod word_list;

pub use controller::{QuizController, QuizSettings};
pub use state::{Continuation, Keyboard, Reply, Turn, UserAction};
