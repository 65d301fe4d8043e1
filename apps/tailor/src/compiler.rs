//! Compilation Gateway — invokes the external LaTeX compiler against an
//! assembled document.
//!
//! Two sequential passes (cross-references need the second), each bounded by
//! a hard timeout. Any failure aborts: the source and the full compiler
//! transcript are archived for postmortem and the scratch directory is
//! retained. Failures are never retried here — a bad document needs upstream
//! correction, not a repeated identical attempt.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};

const SOURCE_FILENAME: &str = "resume.tex";
const OUTPUT_FILENAME: &str = "resume.pdf";
const COMPILE_PASSES: u32 = 2;

/// Why a compile attempt was classified as failed. The name suffixes the
/// archived failure bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// Compiler exited nonzero.
    Failed,
    /// Both passes exited zero but no (or an empty) PDF was produced.
    MissingOutput,
    /// A pass exceeded its time bound.
    Timeout,
    /// Spawn or I/O error around the compiler invocation.
    Error,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::Failed => "failed",
            FailureCategory::MissingOutput => "missing-output",
            FailureCategory::Timeout => "timeout",
            FailureCategory::Error => "error",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hard compile failure, carrying the persisted failure bundle location.
#[derive(Debug, Error)]
#[error("{category} ({base_name}): {detail}")]
pub struct CompilationFailure {
    pub category: FailureCategory,
    pub base_name: String,
    pub detail: String,
    /// Archived copy of the source document, if archiving succeeded.
    pub archived_source: Option<PathBuf>,
    /// Archived compiler transcript, if archiving succeeded.
    pub archived_log: Option<PathBuf>,
    /// Retained scratch directory for postmortem; cleaned up externally.
    pub scratch_dir: Option<PathBuf>,
}

/// Successful compile output.
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    pub pdf: Bytes,
    pub transcript: String,
}

/// Outcome of one compiler pass.
enum PassOutcome {
    Success(String),
    NonZero {
        status: std::process::ExitStatus,
        transcript: String,
    },
    TimedOut,
    SpawnError(std::io::Error),
}

#[derive(Debug, Clone)]
pub struct CompilerGateway {
    bin: String,
    failed_dir: PathBuf,
    probe_timeout: Duration,
    pass_timeout: Duration,
}

impl CompilerGateway {
    pub fn new(
        bin: impl Into<String>,
        failed_dir: impl Into<PathBuf>,
        probe_timeout: Duration,
        pass_timeout: Duration,
    ) -> Self {
        Self {
            bin: bin.into(),
            failed_dir: failed_dir.into(),
            probe_timeout,
            pass_timeout,
        }
    }

    /// Startup probe: compile a minimal smoke document built on the same
    /// preamble (same package set) as production documents. Run once per
    /// process lifetime; a `false` result must abort the run.
    pub async fn verify_toolchain(&self, preamble: &str) -> (bool, String) {
        let smoke = format!(
            "{}\n\n\\begin{{document}}\nToolchain probe.\n\\end{{document}}\n",
            preamble.trim_end()
        );

        let scratch = match tempfile::Builder::new().prefix("tailor-probe-").tempdir() {
            Ok(dir) => dir,
            Err(e) => return (false, format!("cannot create probe scratch dir: {e}")),
        };
        if let Err(e) = tokio::fs::write(scratch.path().join(SOURCE_FILENAME), &smoke).await {
            return (false, format!("cannot write probe document: {e}"));
        }

        match self.run_pass(scratch.path(), self.probe_timeout).await {
            PassOutcome::Success(_) => {
                if pdf_len(scratch.path()).await > 0 {
                    (true, format!("compiler '{}' ok", self.bin))
                } else {
                    (
                        false,
                        format!("compiler '{}' produced no PDF for the smoke document", self.bin),
                    )
                }
            }
            PassOutcome::NonZero { status, transcript } => (
                false,
                format!(
                    "compiler '{}' failed the smoke document ({status}); a preamble package may be missing: {}",
                    self.bin,
                    tail(&transcript, 400)
                ),
            ),
            PassOutcome::TimedOut => (
                false,
                format!(
                    "compiler '{}' timed out after {:?} on the smoke document",
                    self.bin, self.probe_timeout
                ),
            ),
            PassOutcome::SpawnError(e) if e.kind() == std::io::ErrorKind::NotFound => (
                false,
                format!("compiler binary '{}' not found: {e}", self.bin),
            ),
            PassOutcome::SpawnError(e) => (false, format!("cannot run compiler '{}': {e}", self.bin)),
        }
    }

    /// Compiles `document` in an isolated scratch directory, two passes.
    /// The scratch directory is deleted only on success; on failure it is
    /// retained and the source + transcript land in the failure archive.
    pub async fn compile(
        &self,
        document: &str,
        base_name: &str,
    ) -> Result<CompiledArtifact, CompilationFailure> {
        let scratch = match tempfile::Builder::new().prefix("tailor-").tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                return Err(self
                    .archive_failure(
                        base_name,
                        FailureCategory::Error,
                        document,
                        "",
                        format!("cannot create scratch dir: {e}"),
                        None,
                    )
                    .await)
            }
        };

        if let Err(e) = tokio::fs::write(scratch.path().join(SOURCE_FILENAME), document).await {
            let kept = scratch.into_path();
            return Err(self
                .archive_failure(
                    base_name,
                    FailureCategory::Error,
                    document,
                    "",
                    format!("cannot write source document: {e}"),
                    Some(kept),
                )
                .await);
        }

        let mut transcript = String::new();
        for pass in 1..=COMPILE_PASSES {
            transcript.push_str(&format!("== pass {pass} ==\n"));
            match self.run_pass(scratch.path(), self.pass_timeout).await {
                PassOutcome::Success(output) => {
                    transcript.push_str(&output);
                }
                PassOutcome::NonZero { status, transcript: out } => {
                    transcript.push_str(&out);
                    let kept = scratch.into_path();
                    // First-pass failure aborts: no second pass is attempted.
                    return Err(self
                        .archive_failure(
                            base_name,
                            FailureCategory::Failed,
                            document,
                            &transcript,
                            format!("pass {pass} exited with {status}"),
                            Some(kept),
                        )
                        .await);
                }
                PassOutcome::TimedOut => {
                    let kept = scratch.into_path();
                    return Err(self
                        .archive_failure(
                            base_name,
                            FailureCategory::Timeout,
                            document,
                            &transcript,
                            format!("pass {pass} exceeded {:?}", self.pass_timeout),
                            Some(kept),
                        )
                        .await);
                }
                PassOutcome::SpawnError(e) => {
                    let kept = scratch.into_path();
                    return Err(self
                        .archive_failure(
                            base_name,
                            FailureCategory::Error,
                            document,
                            &transcript,
                            format!("cannot run compiler '{}': {e}", self.bin),
                            Some(kept),
                        )
                        .await);
                }
            }
        }

        let pdf_path = scratch.path().join(OUTPUT_FILENAME);
        let pdf = match tokio::fs::read(&pdf_path).await {
            Ok(bytes) if !bytes.is_empty() => Bytes::from(bytes),
            Ok(_) | Err(_) => {
                let kept = scratch.into_path();
                return Err(self
                    .archive_failure(
                        base_name,
                        FailureCategory::MissingOutput,
                        document,
                        &transcript,
                        format!("{OUTPUT_FILENAME} missing or empty after {COMPILE_PASSES} passes"),
                        Some(kept),
                    )
                    .await);
            }
        };

        info!(base_name, bytes = pdf.len(), "compile succeeded");
        // scratch dropped here: the directory is removed on the success path
        Ok(CompiledArtifact { pdf, transcript })
    }

    async fn run_pass(&self, workdir: &Path, limit: Duration) -> PassOutcome {
        let mut cmd = Command::new(&self.bin);
        cmd.args(["-interaction=nonstopmode", "-halt-on-error", SOURCE_FILENAME])
            .current_dir(workdir)
            .kill_on_drop(true);

        match timeout(limit, cmd.output()).await {
            Err(_) => PassOutcome::TimedOut,
            Ok(Err(e)) => PassOutcome::SpawnError(e),
            Ok(Ok(output)) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                if output.status.success() {
                    PassOutcome::Success(text)
                } else {
                    PassOutcome::NonZero {
                        status: output.status,
                        transcript: text,
                    }
                }
            }
        }
    }

    /// Persists the failure bundle (`<base>-<category>.tex` / `.log`) and
    /// builds the returned `CompilationFailure`. Archiving is best-effort:
    /// an unwritable archive dir degrades to a warning, never a panic.
    async fn archive_failure(
        &self,
        base_name: &str,
        category: FailureCategory,
        document: &str,
        transcript: &str,
        detail: String,
        scratch_dir: Option<PathBuf>,
    ) -> CompilationFailure {
        let mut archived_source = None;
        let mut archived_log = None;

        if let Err(e) = tokio::fs::create_dir_all(&self.failed_dir).await {
            warn!(dir = %self.failed_dir.display(), "cannot create failure archive dir: {e}");
        } else {
            let source_path = self
                .failed_dir
                .join(format!("{base_name}-{}.tex", category.as_str()));
            match tokio::fs::write(&source_path, document).await {
                Ok(()) => archived_source = Some(source_path),
                Err(e) => warn!("cannot archive failed source: {e}"),
            }

            let log_path = self
                .failed_dir
                .join(format!("{base_name}-{}.log", category.as_str()));
            match tokio::fs::write(&log_path, transcript).await {
                Ok(()) => archived_log = Some(log_path),
                Err(e) => warn!("cannot archive compiler transcript: {e}"),
            }
        }

        if let Some(dir) = &scratch_dir {
            warn!(scratch = %dir.display(), category = %category, "compile failed; scratch retained");
        }

        CompilationFailure {
            category,
            base_name: base_name.to_string(),
            detail,
            archived_source,
            archived_log,
            scratch_dir,
        }
    }
}

async fn pdf_len(workdir: &Path) -> u64 {
    tokio::fs::metadata(workdir.join(OUTPUT_FILENAME))
        .await
        .map(|m| m.len())
        .unwrap_or(0)
}

fn tail(text: &str, max_chars: usize) -> &str {
    let len = text.len();
    if len <= max_chars {
        return text;
    }
    let mut start = len - max_chars;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
