pub mod card;
pub mod review;

pub use card::{Card, Deck};
pub use review::{Quality, ReviewLogEntry, UiGrade};
