use thiserror::Error;

use crate::compiler::CompilationFailure;

/// Pipeline-level error taxonomy.
///
/// Startup errors (`Configuration`, a failed toolchain probe) are fatal to the
/// whole run. Every other variant is caught at the job boundary: the job is
/// logged and skipped, and the batch continues with the next posting.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Candidate source missing or malformed. Fatal — no tailored content can
    /// be produced without it.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Tailoring produced structurally invalid content for this job (e.g. a
    /// profile that yields zero entries). The job is skipped, nothing is
    /// compiled.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Assembled document failed structural pre-checks. Blocks compilation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Hard compile failure — nonzero exit, missing output, or timeout.
    /// Never retried; the failure bundle holds source and transcript.
    #[error("Compilation failed: {0}")]
    Compilation(#[from] CompilationFailure),

    /// Quality gate scored the artifact below the submission threshold.
    /// The artifact is discarded; the compiler output is not treated as a bug.
    #[error("Quality gate rejected artifact ({score}/100): {detail}")]
    QualityRejection { score: u8, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
