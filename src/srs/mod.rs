pub mod due_set;
pub mod finalizer;
pub mod ledger;
pub mod retention;
pub mod scheduler;
pub mod sm2;

pub use due_set::{due_queue, DueCard, DueQueue};
pub use finalizer::{finalize_review, FinalizedReview};
pub use ledger::{forgetting_rate, ForgettingRate};
pub use retention::{card_stats, CardStats};
pub use scheduler::{ReviewOutcome, Scheduler};
pub use sm2::{calculate_sm2, Sm2Result};
