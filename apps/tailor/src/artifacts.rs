//! Local artifact store — persists assembled documents under deterministic,
//! collision-resistant filenames and keeps the compilation-failures ledger.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::models::job::slugify;

const LEDGER_FILENAME: &str = "compilation_failures.jsonl";

/// One row appended for every hard compile failure.
#[derive(Debug, Clone, Serialize)]
pub struct FailureLedgerEntry {
    pub timestamp: DateTime<Utc>,
    pub company: String,
    pub title: String,
    pub source_path: String,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    tex_dir: PathBuf,
    failed_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(tex_dir: impl Into<PathBuf>, failed_dir: impl Into<PathBuf>) -> Self {
        Self {
            tex_dir: tex_dir.into(),
            failed_dir: failed_dir.into(),
        }
    }

    /// `<candidate>-<company>-<title>-<datepart>-<timestamp>.tex`.
    /// The date part is the digits of the posting date when present, else
    /// today; the trailing unix timestamp keeps repeat runs from colliding.
    pub fn document_filename(
        &self,
        candidate: &str,
        company: &str,
        title: &str,
        posted_at: Option<&str>,
    ) -> String {
        let date_part = match posted_at {
            Some(raw) if raw.chars().any(|c| c.is_ascii_digit()) => {
                raw.chars().filter(char::is_ascii_digit).collect::<String>()
            }
            _ => Utc::now().format("%Y%m%d").to_string(),
        };
        format!(
            "{}-{}-{}-{}-{}.tex",
            slugify(candidate),
            slugify(company),
            slugify(title),
            date_part,
            Utc::now().timestamp()
        )
    }

    /// Writes the assembled document text under `tex_dir`.
    pub async fn store_document(&self, filename: &str, text: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.tex_dir).await?;
        let path = self.tex_dir.join(filename);
        tokio::fs::write(&path, text).await?;
        Ok(path)
    }

    /// Appends one JSON line to the failures ledger in `failed_dir`.
    pub async fn append_failure_ledger(
        &self,
        entry: &FailureLedgerEntry,
    ) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.failed_dir).await?;
        let mut line = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.failed_dir.join(LEDGER_FILENAME))
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_shape_uses_posting_date_digits() {
        let store = ArtifactStore::new("tex", "failed");
        let name =
            store.document_filename("Casey Example", "Acme Corp", "Rust Intern", Some("2024-06-01"));
        assert!(
            name.starts_with("casey-example-acme-corp-rust-intern-20240601-"),
            "got {name}"
        );
        assert!(name.ends_with(".tex"));
    }

    #[test]
    fn test_filename_falls_back_to_today_without_posting_date() {
        let store = ArtifactStore::new("tex", "failed");
        let today = Utc::now().format("%Y%m%d").to_string();
        let name = store.document_filename("Casey", "Acme", "Intern", None);
        assert!(name.contains(&format!("-{today}-")), "got {name}");
    }

    #[test]
    fn test_filename_slugs_unknown_fields_to_na() {
        let store = ArtifactStore::new("tex", "failed");
        let name = store.document_filename("Casey", "", "!!!", Some("20240601"));
        assert!(name.starts_with("casey-na-na-20240601-"), "got {name}");
    }

    #[tokio::test]
    async fn test_store_document_writes_under_tex_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path().join("tex"), tmp.path().join("failed"));
        let path = store.store_document("a.tex", "\\documentclass{article}").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "\\documentclass{article}"
        );
    }

    #[tokio::test]
    async fn test_ledger_appends_one_json_line_per_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path().join("tex"), tmp.path().join("failed"));
        let entry = FailureLedgerEntry {
            timestamp: Utc::now(),
            company: "Acme".to_string(),
            title: "Intern".to_string(),
            source_path: "failed/acme-intern-failed.tex".to_string(),
        };
        store.append_failure_ledger(&entry).await.unwrap();
        store.append_failure_ledger(&entry).await.unwrap();

        let ledger =
            std::fs::read_to_string(tmp.path().join("failed").join(LEDGER_FILENAME)).unwrap();
        let lines: Vec<&str> = ledger.lines().collect();
        assert_eq!(lines.len(), 2);
        let row: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(row["company"], "Acme");
        assert_eq!(row["source_path"], "failed/acme-intern-failed.tex");
    }
}
