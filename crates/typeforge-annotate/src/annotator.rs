//! The verify-and-retry annotation loop
//!
//! Every candidate edit is proven against the external type checker before
//! it is kept. The real file is never touched during the loop: each trial
//! is written to a shadow sibling and checked with the checker's shadow
//! mode, so diagnostics report against the real path while the checker
//! reads the trial content.

use std::path::Path;

use typeforge_edit::{Insertion, SourceFile, SourceFileError, WriteMode, WriteOutcome};
use typeforge_syntax::{analyzer_for_path, FunctionNode, SourceAnalyzer};

use crate::checker::{CheckCommand, TypeChecker};
use crate::error::AnnotateError;
use crate::hints::{parse_type_hint_answer, Hint};
use crate::model::{LanguageModel, INSTRUCTIONS};
use crate::planner::{plan_insertions, what_needs_typing, ImportSet};
use crate::prompts::type_prompt;

/// Suffix of the sibling file used for trial verification
pub const SHADOW_SUFFIX: &str = ".shadow";

/// Outcome of annotating one file
#[derive(Debug)]
pub enum FileAnnotation {
    /// The file fails the checker before any edit; nothing was proposed
    BaselineFailed {
        /// Checker output from the baseline run
        output: String,
    },
    /// Verified insertions, ready to commit
    Annotated {
        /// Handle to the loaded file, for the commit step
        source_file: SourceFile,
        /// All accepted insertions, in function order
        insertions: Vec<Insertion>,
    },
}

impl FileAnnotation {
    /// Accepted insertions; empty when the baseline failed
    #[must_use]
    pub fn insertions(&self) -> &[Insertion] {
        match self {
            Self::BaselineFailed { .. } => &[],
            Self::Annotated { insertions, .. } => insertions,
        }
    }

    /// Write the accepted insertions to the real file
    ///
    /// Returns `None` when there is nothing to write, either because the
    /// baseline failed or because no insertion was accepted. Callers choose
    /// [`WriteMode::DryRun`] to validate without touching the file.
    ///
    /// # Errors
    /// Propagates [`SourceFileError`] from the commit, including
    /// [`SourceFileError::ConcurrentModification`] when the file changed on
    /// disk since it was loaded.
    pub fn commit(&self, mode: WriteMode) -> Result<Option<WriteOutcome>, SourceFileError> {
        match self {
            Self::Annotated {
                source_file,
                insertions,
            } if !insertions.is_empty() => {
                let outcome = source_file.update_file_with(insertions, "", mode)?;
                Ok(Some(outcome))
            }
            _ => Ok(None),
        }
    }
}

/// Drives probe, propose, verify, and retry for each function of a file
pub struct TypeAnnotator<'a> {
    model: &'a dyn LanguageModel,
    checker: &'a dyn TypeChecker,
    max_tries: usize,
}

impl<'a> TypeAnnotator<'a> {
    /// New annotator over a model and a checker
    #[must_use]
    pub fn new(model: &'a dyn LanguageModel, checker: &'a dyn TypeChecker) -> Self {
        Self {
            model,
            checker,
            max_tries: 2,
        }
    }

    /// Annotate one file
    ///
    /// Runs the checker baseline first; a failing baseline aborts with
    /// [`FileAnnotation::BaselineFailed`] before any model call, since a
    /// file that already fails cannot distinguish a bad hint from a
    /// pre-existing problem. Otherwise every function still missing types
    /// goes through the probe/propose/verify loop, and the accepted
    /// insertions are returned unwritten.
    ///
    /// # Errors
    /// File-level failures only: unsupported extension, unreadable or
    /// unparsable file, a baseline checker that cannot be invoked, or a
    /// model transport failure.
    pub async fn annotate_file(&self, path: &Path) -> Result<FileAnnotation, AnnotateError> {
        let analyzer =
            analyzer_for_path(path).ok_or_else(|| AnnotateError::UnsupportedExtension {
                path: path.to_path_buf(),
            })?;
        tracing::info!(path = %path.display(), "annotating file");

        let baseline = self.checker.run(&CheckCommand::mypy(path)).await?;
        if !baseline.success {
            tracing::warn!(path = %path.display(), "baseline check failed, skipping file");
            return Ok(FileAnnotation::BaselineFailed {
                output: baseline.output,
            });
        }

        let (source_file, text) = SourceFile::load(path)?;
        let module = analyzer.parse(&text)?;
        let mut imports = ImportSet::from_module(&module);
        let mut insertions = Vec::new();

        for function in module.functions() {
            let needs = what_needs_typing(function);
            if needs.is_empty() {
                continue;
            }
            let accepted = self
                .try_function(&source_file, function, &needs, &mut imports)
                .await?;
            insertions.extend(accepted);
        }

        Ok(FileAnnotation::Annotated {
            source_file,
            insertions,
        })
    }

    /// Probe, then propose and verify with up to `max_tries` proposals
    ///
    /// The probe writes deliberately wrong `None` hints to the shadow and
    /// runs the checker once, harvesting an error message that tells the
    /// model what the real types look like. Probe failures are expected and
    /// tolerated. Each proposal is then verified on the shadow: a pass
    /// accepts the trial and commits its imports, a checker rejection
    /// retries with the fresh error text, and a proposal that plans nothing
    /// is discarded without consuming a retry.
    async fn try_function(
        &self,
        source_file: &SourceFile,
        function: &FunctionNode,
        needs: &[String],
        imports: &mut ImportSet,
    ) -> Result<Vec<Insertion>, AnnotateError> {
        let shadow_command = CheckCommand::mypy(source_file.path())
            .with_shadow(source_file.path(), &shadow_path(source_file.path()));
        let mut previous_error = String::new();

        let probe_hints: Vec<Hint> = needs.iter().map(|n| Hint::new(n.clone(), "None")).collect();
        let probe = plan_insertions(function, &probe_hints, &mut imports.clone());
        if !probe.is_empty() {
            source_file.update_file(&probe, SHADOW_SUFFIX)?;
            match self.checker.run(&shadow_command).await {
                Ok(report) if !report.success => previous_error = report.output,
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(function = function.name(), %error, "probe check failed to run");
                }
            }
        }

        for try_num in 0..self.max_tries {
            if try_num > 0 {
                tracing::info!(function = function.name(), "retrying");
            }
            let prompt = type_prompt(function.text(), needs, &previous_error);
            let answer = self.model.respond(INSTRUCTIONS, &[], &prompt).await?;
            let hints = parse_type_hint_answer(&answer);

            let mut trial_imports = imports.clone();
            let trial = plan_insertions(function, &hints, &mut trial_imports);
            if trial.is_empty() {
                // The model offered nothing usable; retrying the same
                // prompt would not change that.
                tracing::info!(function = function.name(), "no usable hints, discarding");
                return Ok(Vec::new());
            }

            source_file.update_file(&trial, SHADOW_SUFFIX)?;
            match self.checker.run(&shadow_command).await {
                Ok(report) if report.success => {
                    tracing::info!(function = function.name(), "type checker passed, keeping");
                    *imports = trial_imports;
                    return Ok(trial);
                }
                Ok(report) => {
                    tracing::info!(function = function.name(), "type checker failed, discarding");
                    previous_error = report.output;
                }
                Err(error) => {
                    tracing::warn!(function = function.name(), %error, "checker failed to run, discarding");
                    return Ok(Vec::new());
                }
            }
        }
        Ok(Vec::new())
    }
}

/// The shadow sibling of a path
fn shadow_path(path: &Path) -> std::path::PathBuf {
    let mut shadow = path.as_os_str().to_os_string();
    shadow.push(SHADOW_SUFFIX);
    shadow.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_path_appends_suffix() {
        assert_eq!(
            shadow_path(Path::new("/tmp/x.py")),
            Path::new("/tmp/x.py.shadow")
        );
    }
}
