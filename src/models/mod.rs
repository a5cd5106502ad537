pub mod case;
pub mod quiz;
pub mod score;

pub use case::CaseRecord;
pub use quiz::{AnswerGrade, GradingOutcome, GradingReport, QuestionSet};
pub use score::{ScoreBand, ScoreCategory, ScoreOutcome, ScoreRecord, MAX_PERCENTAGE, MAX_SUBSCORE};
