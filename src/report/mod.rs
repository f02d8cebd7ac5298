//! Markdown report composition.
//!
//! Two composers, both pure orchestration over the engine: the daily
//! briefing (latest vs. rolling baseline per domain) and the copilot
//! report (diagnostic, predictive, prescriptive). Each returns a plain
//! markdown string; writing it anywhere is the caller's business.

pub mod briefing;
pub mod copilot;

pub use briefing::generate_briefing;
pub use copilot::generate_copilot;
