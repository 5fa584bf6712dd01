pub mod filter;
pub mod reports;

pub use filter::StoryFilter;
pub use reports::{OutcomeSummary, ProgramSummary, StoreStats};
