//! Article analysis and the ingestion pipeline.
//!
//! [`AnthropicAnalyzer`] turns article text into a validated [`Analysis`]
//! (summary, label, confidence). [`IngestPipeline`] drives one run over the
//! collaborator traits from `cointrend-core`.
//!
//! [`Analysis`]: cointrend_core::Analysis

pub mod analyzer;
pub mod parse;
pub mod pipeline;

pub use analyzer::{AnthropicAnalyzer, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
pub use parse::parse_analysis;
pub use pipeline::{
    CandidateOutcome, CandidateReport, FixedDelay, IngestPipeline, IngestReport, NoDelay, NoProgress,
    Pacer, PipelineError, Progress,
};
