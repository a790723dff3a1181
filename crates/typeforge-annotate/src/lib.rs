//! Checker-verified annotation
//!
//! The top of the stack: decides which identifiers still need types, plans
//! the exact insertions for model-proposed hints, and drives the
//! probe/propose/verify/retry protocol that uses an external type checker
//! as the oracle for keeping or discarding each candidate edit.
//!
//! The language model and the type checker are collaborators behind the
//! [`LanguageModel`] and [`TypeChecker`] traits; this crate owns neither
//! transport nor retry/backoff for them.

pub mod annotator;
pub mod checker;
pub mod doc;
pub mod error;
pub mod hints;
pub mod model;
pub mod overview;
pub mod planner;
pub mod prompts;

pub use annotator::{FileAnnotation, TypeAnnotator, SHADOW_SUFFIX};
pub use checker::{CheckCommand, CheckReport, CheckerError, CommandChecker, TypeChecker};
pub use doc::plan_docstrings;
pub use error::AnnotateError;
pub use hints::{parse_type_hint_answer, Hint};
pub use model::{LanguageModel, ModelError, INSTRUCTIONS};
pub use overview::render_functions;
pub use planner::{plan_insertions, what_needs_typing, ImportSet};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
