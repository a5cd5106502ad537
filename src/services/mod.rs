pub mod comparison_evaluator;
pub mod content_generator;
pub mod prompts;
pub mod self_test;

pub use comparison_evaluator::ComparisonEvaluator;
pub use content_generator::ContentGenerator;
pub use self_test::SelfTestService;
