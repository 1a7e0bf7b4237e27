//! Categorization of relevant posts.
//!
//! Focused mode picks the best posts for one category; bulk mode splits posts
//! three ways and leaves failure handling to the caller, which substitutes
//! the keyword classifier in [`heuristic_categorize`].

mod bulk;
mod focused;
mod heuristic;

pub use bulk::categorize_all;
pub use focused::categorize_focused;
pub use heuristic::heuristic_categorize;

const CATEGORIZE_TEMPERATURE: f32 = 0.2;
