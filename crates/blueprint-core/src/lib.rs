//! Blueprint engine
//!
//! Turns a catalog of algorithm problems into reorderable "solution
//! blueprint" puzzles. Every problem's solution is produced by a strategy,
//! checked by a semantic verifier against the problem's contract, and only
//! then compiled into cards. Anything that fails is surfaced as a visible
//! error card, never silently replaced.
//!
//! ```no_run
//! use blueprint_core::{Engine, PipelineConfig};
//!
//! let engine = Engine::production(PipelineConfig::default())?;
//! let report = engine.coverage_report();
//! assert!(report.gate_violations().is_empty());
//! # Ok::<(), blueprint_core::BlueprintError>(())
//! ```

pub mod catalog;
pub mod comparators;
pub mod config;
pub mod contract;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod ir;
pub mod level;
pub mod pipeline;
pub mod problem;
pub mod rng;
mod solutions;
pub mod strategy;
pub mod taxonomy;
pub mod template;
pub mod verifier;

pub use comparators::{compare_by_output_mode, OutputMode};
pub use config::PipelineConfig;
pub use contract::{validate_contract_schema, Contract, ContractRegistry, TestCase};
pub use coverage::CoverageReport;
pub use engine::Engine;
pub use error::{BlueprintError, BlueprintResult, SolveError, SolveResult};
pub use ir::{compile, Card, IrNode, Op};
pub use level::{build_level, build_levels, Level};
pub use pipeline::{
    GeneratedSolution, GenerationRequest, GenerationStatus, SolutionPipeline, SolutionSource,
};
pub use problem::{Difficulty, Problem};
pub use rng::VerifierRng;
pub use strategy::{Strategy, StrategyKind, StrategyRegistry};
pub use taxonomy::{profile_for, TaxonomyProfile, Wave};
pub use template::{TemplateFamily, TemplateId};
pub use verifier::{Confidence, VerificationResult, Verifier, VerifierConfig};
