//! Pipeline orchestration — one posting at a time through selection,
//! assembly, compilation, and the quality gate.
//!
//! Flow per job: extract keywords → tailor content → assemble document →
//! validate → persist .tex → compile → extract text → score → accept/reject.
//!
//! Per-job errors are caught at the job boundary and logged with enough
//! context (company/title/key) to resume with the next posting; nothing
//! commits external state before the quality gate accepts.

use std::collections::HashSet;
use std::path::PathBuf;

use bytes::Bytes;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::artifacts::{ArtifactStore, FailureLedgerEntry};
use crate::assembler::{assemble, validate_document};
use crate::compiler::CompilerGateway;
use crate::config::Config;
use crate::errors::PipelineError;
use crate::models::job::JobPosting;
use crate::models::profile::CandidateProfile;
use crate::models::quality::QualityScore;
use crate::quality::{extract_artifact_text, score_artifact};
use crate::scoring::extract_keywords;
use crate::selector::{tailor, SelectionLimits};

/// A posting that survived the whole pipeline.
#[derive(Debug)]
pub struct ProcessedJob {
    pub job_key: String,
    pub document_path: PathBuf,
    pub artifact: Bytes,
    pub quality: QualityScore,
}

/// End-of-run counts.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
    pub duplicates: usize,
}

pub struct Pipeline {
    config: Config,
    profile: CandidateProfile,
    artifacts: ArtifactStore,
    compiler: CompilerGateway,
    limits: SelectionLimits,
}

impl Pipeline {
    pub fn new(config: Config, profile: CandidateProfile, compiler: CompilerGateway) -> Self {
        let artifacts = ArtifactStore::new(&config.artifact_dir, &config.failed_dir);
        Self {
            config,
            profile,
            artifacts,
            compiler,
            limits: SelectionLimits::default(),
        }
    }

    /// Processes every posting sequentially, skipping in-run duplicates.
    /// Per-job errors never abort the batch.
    pub async fn run(&self, jobs: &[JobPosting]) -> RunSummary {
        let mut summary = RunSummary {
            total: jobs.len(),
            ..RunSummary::default()
        };
        let mut seen_keys: HashSet<String> = HashSet::new();

        for (i, job) in jobs.iter().enumerate() {
            let key = job.job_key();
            if !seen_keys.insert(key.clone()) {
                info!(company = job.company(), title = job.role(), "duplicate posting skipped");
                summary.duplicates += 1;
                continue;
            }

            info!(
                company = job.company(),
                title = job.role(),
                salary = %job.format_salary(),
                "[{}/{}] processing posting",
                i + 1,
                jobs.len()
            );

            match self.process_job(job).await {
                Ok(processed) => {
                    info!(
                        company = job.company(),
                        title = job.role(),
                        score = processed.quality.overall,
                        tier = processed.quality.tier.label(),
                        pdf_bytes = processed.artifact.len(),
                        "accepted"
                    );
                    summary.accepted += 1;
                }
                Err(PipelineError::QualityRejection { score, detail }) => {
                    warn!(
                        company = job.company(),
                        title = job.role(),
                        score,
                        "quality gate rejected artifact: {detail}"
                    );
                    summary.rejected += 1;
                }
                Err(e) => {
                    error!(
                        company = job.company(),
                        title = job.role(),
                        key,
                        "posting failed: {e}"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            total = summary.total,
            accepted = summary.accepted,
            rejected = summary.rejected,
            failed = summary.failed,
            duplicates = summary.duplicates,
            "pipeline run complete"
        );
        summary
    }

    /// Runs one posting through the full pipeline.
    pub async fn process_job(&self, job: &JobPosting) -> Result<ProcessedJob, PipelineError> {
        let description = job.description_text();
        let keywords = extract_keywords(description);
        info!(keywords = keywords.len(), "extracted keywords from description");

        let tailored = tailor(&self.profile, &keywords, &self.limits);
        if tailored.experience.is_empty() && tailored.projects.is_empty() {
            return Err(PipelineError::Generation(
                "tailoring produced no experience or project entries".to_string(),
            ));
        }

        let document = assemble(
            &self.profile.preamble,
            &self.profile.contact,
            &self.profile.education,
            &tailored,
            self.config.brace_tolerance,
        );
        validate_document(&document)?;

        let filename = self.artifacts.document_filename(
            &self.profile.contact.name,
            job.company(),
            job.role(),
            job.posted_at.as_deref(),
        );
        let document_path = self.artifacts.store_document(&filename, document.as_str()).await?;
        info!(path = %document_path.display(), "assembled document persisted");

        let job_key = job.job_key();
        let artifact = match self.compiler.compile(document.as_str(), &job_key).await {
            Ok(artifact) => artifact,
            Err(failure) => {
                let source_path = failure
                    .archived_source
                    .as_deref()
                    .unwrap_or(&document_path)
                    .display()
                    .to_string();
                let entry = FailureLedgerEntry {
                    timestamp: Utc::now(),
                    company: job.company().to_string(),
                    title: job.role().to_string(),
                    source_path,
                };
                if let Err(e) = self.artifacts.append_failure_ledger(&entry).await {
                    warn!("cannot append to compilation failures ledger: {e}");
                }
                return Err(PipelineError::Compilation(failure));
            }
        };

        let artifact_text = extract_artifact_text(&artifact.pdf);
        let quality = score_artifact(&artifact_text, description, self.config.quality_threshold);

        if !quality.should_submit {
            return Err(PipelineError::QualityRejection {
                score: quality.overall,
                detail: format!(
                    "keyword match {:.0}%, missing: {}",
                    quality.keyword_match_pct,
                    quality.missing_keywords.join(", ")
                ),
            });
        }

        Ok(ProcessedJob {
            job_key,
            document_path,
            artifact: artifact.pdf,
            quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::parse_profile;
    use serde_json::json;

    fn test_config(root: &std::path::Path, latex_bin: &str) -> Config {
        Config {
            profile_path: root.join("profile.txt"),
            artifact_dir: root.join("tex"),
            failed_dir: root.join("failed"),
            latex_bin: latex_bin.to_string(),
            quality_threshold: 60,
            brace_tolerance: 5,
            probe_timeout_secs: 5,
            pass_timeout_secs: 5,
            rust_log: "info".to_string(),
        }
    }

    fn posting() -> JobPosting {
        serde_json::from_value(json!({
            "id": "42",
            "companyName": "Acme Corp",
            "title": "Rust Intern",
            "postedAt": "2024-06-01",
            "description": "React, PostgreSQL, Docker required"
        }))
        .unwrap()
    }

    #[cfg(unix)]
    mod end_to_end {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;

        fn fake_compiler(dir: &std::path::Path, body: &str) -> String {
            let path = dir.join("fake-latex.sh");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        fn pipeline_with(root: &std::path::Path, bin: &str) -> Pipeline {
            let config = test_config(root, bin);
            let profile = parse_profile(crate::store::SAMPLE_PROFILE).unwrap();
            let compiler = CompilerGateway::new(
                bin,
                &config.failed_dir,
                Duration::from_secs(5),
                Duration::from_secs(5),
            );
            Pipeline::new(config, profile, compiler)
        }

        #[tokio::test]
        async fn test_unextractable_pdf_degrades_to_accept() {
            // The fake compiler emits bytes pdf-extract cannot parse; the
            // gate must degrade to "unknown quality, proceed".
            let tmp = tempfile::tempdir().unwrap();
            let bin = fake_compiler(tmp.path(), "printf '%s' NOTAPDF > resume.pdf");
            let pipeline = pipeline_with(tmp.path(), &bin);

            let processed = pipeline.process_job(&posting()).await.unwrap();
            assert_eq!(processed.quality.overall, 0);
            assert!(processed.quality.should_submit);
            assert_eq!(&processed.artifact[..], b"NOTAPDF");
            assert!(processed.document_path.exists());
            let tex = std::fs::read_to_string(&processed.document_path).unwrap();
            assert!(tex.starts_with("\\documentclass"));
        }

        #[tokio::test]
        async fn test_compile_failure_is_ledgered_and_skips_job() {
            let tmp = tempfile::tempdir().unwrap();
            let bin = fake_compiler(tmp.path(), "exit 1");
            let pipeline = pipeline_with(tmp.path(), &bin);

            let err = pipeline.process_job(&posting()).await.unwrap_err();
            assert!(matches!(err, PipelineError::Compilation(_)), "got {err:?}");

            let ledger = std::fs::read_to_string(
                tmp.path().join("failed").join("compilation_failures.jsonl"),
            )
            .unwrap();
            let row: serde_json::Value = serde_json::from_str(ledger.lines().next().unwrap()).unwrap();
            assert_eq!(row["company"], "Acme Corp");
            assert_eq!(row["title"], "Rust Intern");
            assert!(row["source_path"].as_str().unwrap().contains("-failed.tex"));

            // retained scratch from the fake compile; clean up after asserting
            if let PipelineError::Compilation(failure) = err {
                if let Some(scratch) = failure.scratch_dir {
                    std::fs::remove_dir_all(scratch).ok();
                }
            }
        }

        #[tokio::test]
        async fn test_run_counts_duplicates_and_failures() {
            let tmp = tempfile::tempdir().unwrap();
            let bin = fake_compiler(tmp.path(), "exit 1");
            let pipeline = pipeline_with(tmp.path(), &bin);

            let jobs = vec![posting(), posting()];
            let summary = pipeline.run(&jobs).await;
            assert_eq!(summary.total, 2);
            assert_eq!(summary.duplicates, 1, "identical postings dedup on job key");
            assert_eq!(summary.failed, 1);
            assert_eq!(summary.accepted, 0);
        }
    }

    #[tokio::test]
    async fn test_empty_profile_is_generation_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path(), "pdflatex");
        let mut profile = parse_profile(crate::store::SAMPLE_PROFILE).unwrap();
        profile.experience.clear();
        profile.projects.clear();
        let compiler = CompilerGateway::new(
            "pdflatex",
            &config.failed_dir,
            std::time::Duration::from_secs(1),
            std::time::Duration::from_secs(1),
        );
        let pipeline = Pipeline::new(config, profile, compiler);

        let err = pipeline.process_job(&posting()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Generation(_)), "got {err:?}");
    }
}
