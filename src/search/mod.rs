//! The search core: matching, grouping, planning, and orchestration.

pub mod cancel;
pub mod driver;
pub mod matcher;
pub mod orchestrator;
pub mod parsers;
pub mod planner;

pub use cancel::CancelToken;
pub use driver::{Conversation, SearchResult, scan_log};
pub use matcher::{DEFAULT_FUZZY_THRESHOLD, LineMatcher, SearchMode};
pub use orchestrator::{SearchOutcome, SearchRequest, run_search};
pub use planner::{ExecutionPlan, choose_execution_plan};
