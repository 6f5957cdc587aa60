//! Renderings of a finished review. Everything here is a pure function of
//! [`PipelineState`](crate::pipeline::PipelineState).

mod detailed;
pub mod results;
mod terminal;

pub use detailed::{finding_text, render_report};
pub use results::{BatchEntry, BatchReport, ReviewResults};
pub use terminal::render_summary;
