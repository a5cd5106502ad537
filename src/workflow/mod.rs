pub mod resolution_flow;
pub mod self_test_flow;
pub mod session;

pub use resolution_flow::ResolutionFlow;
pub use self_test_flow::SelfTestFlow;
pub use session::{SessionState, Step};
