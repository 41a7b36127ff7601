// src/lib.rs
pub mod loaders;
pub mod matching;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use matching::fuser::TableFuser;
pub use matching::resolver::{MatcherConfig, RecordMatcher};
pub use matching::similarity::{closeness, FuzzyNameScorer, NameScorer};
pub use models::match_result::{MatchResult, WindowAttempt, WindowOutcome};
pub use models::records::{FinancePayload, FinanceRecord, IdeologyRecord, MatchKey, TargetRecord};
