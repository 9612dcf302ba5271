//! Pattern-match analysis for the Thorn compiler.
//!
//! Takes one typed match site ([`thorn_ir::MatchSpec`]) and produces a
//! compiled decision tree plus every coverage finding for it:
//!
//! 1. **Normalization** (`normalize`): surface patterns → canonical
//!    [`thorn_ir::Pat`] — rest markers expanded, record fields reordered,
//!    or-pattern binding sets checked.
//! 2. **Usefulness** (`usefulness`): Maranget-style matrix specialization
//!    deciding exhaustiveness (with concrete witnesses) and per-arm
//!    reachability.
//! 3. **Compilation** (`compile`): the pattern matrix → a
//!    [`thorn_ir::DecisionTree`] with explicit binding extraction paths and
//!    guard fallthrough.
//! 4. **Refutability** (`refutability`): single-pattern classification for
//!    binding-context validation.
//!
//! The whole pipeline is a pure function of its inputs: no I/O, no shared
//! mutable state, deterministic output. One analysis call covers one match
//! site and holds nothing afterwards.
//!
//! # Pipeline Position
//!
//! ```text
//! Parse → Type Check → **thorn_match** → codegen / diagnostic printer
//! ```
//!
//! # Prior Art
//!
//! - Maranget (2008) "Compiling Pattern Matching to Good Decision Trees"
//! - Maranget (2007) "Warnings for pattern matching"
//! - Roc `crates/compiler/mono/src/ir/decision_tree.rs`
//! - Elm `compiler/src/Nitpick/PatternMatches.hs`

mod check;
mod compile;
mod error;
mod normalize;
mod refutability;
mod report;
mod usefulness;

pub use check::{analyze, MatchAnalysis};
pub use compile::compile;
pub use error::MatchError;
pub use normalize::NormalizeCtx;
pub use refutability::{
    check_binding_context, check_conditional_context, classify, Refutability,
};
pub use report::{error_to_diagnostic, problems_to_diagnostics};
pub use usefulness::{AnalysisConfig, ExhaustivenessReport, UsefulnessCtx};
