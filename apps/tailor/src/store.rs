//! Candidate Content Store — parses the fixed-format background source into
//! the structured profile model.
//!
//! The source is a marker-delimited text file:
//!
//! ```text
//! BEGIN PREAMBLE … END PREAMBLE      raw LaTeX, must contain \documentclass
//! BEGIN CONTACT … END CONTACT        Key: value lines, Name required
//! BEGIN EDUCATION … END EDUCATION    Key: value lines
//! BEGIN EXPERIENCE … END EXPERIENCE  repeated; Key: value header, "- " bullets
//! BEGIN PROJECT … END PROJECT        repeated; Stack: optional
//! BEGIN SKILLS … END SKILLS          Category: a, b, c lines
//! ```
//!
//! Loaded once per run; the resulting profile is read-only process-wide state.

use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::PipelineError;
use crate::models::profile::{CandidateProfile, Contact, Education, Experience, Project};

/// Reads and parses the candidate source. Missing file or missing structural
/// markers are fatal — no tailored content can be produced without them.
pub async fn load_profile(path: &Path) -> Result<CandidateProfile, PipelineError> {
    let source = tokio::fs::read_to_string(path).await.map_err(|e| {
        PipelineError::Configuration(format!(
            "cannot read candidate profile '{}': {e}",
            path.display()
        ))
    })?;
    parse_profile(&source)
}

/// Parses the marker-delimited source text.
pub fn parse_profile(source: &str) -> Result<CandidateProfile, PipelineError> {
    let blocks = collect_blocks(source)?;

    let preamble = blocks
        .iter()
        .find(|(name, _)| name == "PREAMBLE")
        .map(|(_, lines)| lines.join("\n"))
        .ok_or_else(|| {
            PipelineError::Configuration("missing BEGIN PREAMBLE…END PREAMBLE block".to_string())
        })?;
    if !preamble.contains("\\documentclass") {
        return Err(PipelineError::Configuration(
            "preamble block has no \\documentclass directive".to_string(),
        ));
    }

    let contact = parse_contact(find_block(&blocks, "CONTACT")?)?;
    let education = parse_education(find_block(&blocks, "EDUCATION")?);

    let experience: Vec<Experience> = blocks
        .iter()
        .filter(|(name, _)| name == "EXPERIENCE")
        .map(|(_, lines)| parse_experience(lines))
        .collect::<Result<_, _>>()?;

    let projects: Vec<Project> = blocks
        .iter()
        .filter(|(name, _)| name == "PROJECT")
        .map(|(_, lines)| parse_project(lines))
        .collect::<Result<_, _>>()?;

    let skills = parse_skills(find_block(&blocks, "SKILLS")?);

    Ok(CandidateProfile {
        preamble,
        contact,
        education,
        experience,
        projects,
        skills,
    })
}

type Block = (String, Vec<String>);

fn collect_blocks(source: &str) -> Result<Vec<Block>, PipelineError> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for line in source.lines() {
        let trimmed = line.trim();
        if let Some(name) = trimmed.strip_prefix("BEGIN ") {
            if let Some((open, _)) = &current {
                return Err(PipelineError::Configuration(format!(
                    "BEGIN {name} before END {open}"
                )));
            }
            current = Some((name.trim().to_string(), Vec::new()));
        } else if let Some(name) = trimmed.strip_prefix("END ") {
            match current.take() {
                Some((open, lines)) if open == name.trim() => blocks.push((open, lines)),
                Some((open, _)) => {
                    return Err(PipelineError::Configuration(format!(
                        "END {name} does not close BEGIN {open}"
                    )))
                }
                None => {
                    return Err(PipelineError::Configuration(format!(
                        "END {name} without a matching BEGIN"
                    )))
                }
            }
        } else if let Some((_, lines)) = &mut current {
            lines.push(line.to_string());
        }
        // Text outside any block is ignored (comments, blank separators).
    }

    if let Some((open, _)) = current {
        return Err(PipelineError::Configuration(format!(
            "BEGIN {open} never closed"
        )));
    }
    Ok(blocks)
}

fn find_block<'a>(blocks: &'a [Block], name: &str) -> Result<&'a [String], PipelineError> {
    blocks
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, lines)| lines.as_slice())
        .ok_or_else(|| PipelineError::Configuration(format!("missing BEGIN {name}…END {name} block")))
}

/// Splits a block into `Key: value` header fields and `- ` bullet lines.
fn split_fields_and_bullets(lines: &[String]) -> (BTreeMap<String, String>, Vec<String>) {
    let mut fields = BTreeMap::new();
    let mut bullets = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(bullet) = trimmed.strip_prefix("- ") {
            bullets.push(bullet.trim().to_string());
        } else if let Some((key, value)) = trimmed.split_once(':') {
            fields.insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }
    (fields, bullets)
}

fn parse_contact(lines: &[String]) -> Result<Contact, PipelineError> {
    let (fields, _) = split_fields_and_bullets(lines);
    let name = fields
        .get("name")
        .filter(|n| !n.is_empty())
        .cloned()
        .ok_or_else(|| PipelineError::Configuration("CONTACT block is missing Name".to_string()))?;
    Ok(Contact {
        name,
        email: fields.get("email").cloned(),
        phone: fields.get("phone").cloned(),
        linkedin: fields.get("linkedin").cloned(),
        github: fields.get("github").cloned(),
        website: fields.get("website").cloned(),
    })
}

fn parse_education(lines: &[String]) -> Education {
    let (fields, _) = split_fields_and_bullets(lines);
    Education {
        institution: fields.get("institution").cloned().unwrap_or_default(),
        degree: fields.get("degree").cloned().unwrap_or_default(),
        dates: fields.get("dates").cloned(),
        location: fields.get("location").cloned(),
    }
}

fn parse_experience(lines: &[String]) -> Result<Experience, PipelineError> {
    let (fields, bullets) = split_fields_and_bullets(lines);
    let name = fields
        .get("name")
        .filter(|n| !n.is_empty())
        .cloned()
        .ok_or_else(|| {
            PipelineError::Configuration("EXPERIENCE block is missing Name".to_string())
        })?;
    Ok(Experience {
        name,
        organization: fields.get("organization").cloned(),
        dates: fields.get("dates").cloned(),
        location: fields.get("location").cloned(),
        bullets,
    })
}

fn parse_project(lines: &[String]) -> Result<Project, PipelineError> {
    let (fields, bullets) = split_fields_and_bullets(lines);
    let name = fields
        .get("name")
        .filter(|n| !n.is_empty())
        .cloned()
        .ok_or_else(|| PipelineError::Configuration("PROJECT block is missing Name".to_string()))?;
    Ok(Project {
        name,
        dates: fields.get("dates").cloned(),
        stack: fields.get("stack").cloned(),
        bullets,
    })
}

fn parse_skills(lines: &[String]) -> Vec<(String, Vec<String>)> {
    lines
        .iter()
        .filter_map(|line| {
            let trimmed = line.trim();
            let (category, rest) = trimmed.split_once(':')?;
            let entries: Vec<String> = rest
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if category.trim().is_empty() || entries.is_empty() {
                None
            } else {
                Some((category.trim().to_string(), entries))
            }
        })
        .collect()
}

/// Shared test fixture: a small but complete candidate source.
#[cfg(test)]
pub(crate) const SAMPLE_PROFILE: &str = r"
BEGIN PREAMBLE
\documentclass[letterpaper,11pt]{article}
\usepackage{latexsym}
\usepackage{titlesec}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}
\newcommand{\resumeItem}[1]{\item\small{#1}}
\newcommand{\resumeSubheading}[4]{\item\textbf{#1} \hfill #2 \\ \textit{\small#3} \hfill \textit{\small #4}}
\newcommand{\resumeProjectHeading}[2]{\item\small{#1} \hfill #2}
\newcommand{\resumeSubHeadingListStart}{\begin{itemize}[leftmargin=0.15in, label={}]}
\newcommand{\resumeSubHeadingListEnd}{\end{itemize}}
\newcommand{\resumeItemListStart}{\begin{itemize}}
\newcommand{\resumeItemListEnd}{\end{itemize}}
END PREAMBLE

BEGIN CONTACT
Name: Casey Example
Email: casey@example.com
Phone: 555-0100
GitHub: github.com/casey
END CONTACT

BEGIN EDUCATION
Institution: State University
Degree: B.S. Computer Science
Dates: Aug 2021 -- May 2025
Location: Springfield, IL
END EDUCATION

BEGIN EXPERIENCE
Name: Software Engineering Intern
Organization: Acme Corp
Dates: May 2024 -- Aug 2024
Location: Remote
- Built React dashboards backed by PostgreSQL for internal analytics
- Containerized services with Docker and wired CI through GitHub Actions
- Wrote integration tests for the billing API
END EXPERIENCE

BEGIN EXPERIENCE
Name: Teaching Assistant
Organization: State University
Dates: Jan 2023 -- May 2024
- Led weekly lab sections on data structures
END EXPERIENCE

BEGIN PROJECT
Name: Trail Tracker
Stack: Rust, PostgreSQL, Docker
Dates: 2024
- Designed a REST API in Rust with per-user rate limiting
- Deployed with Docker Compose behind nginx
END PROJECT

BEGIN PROJECT
Name: Recipe Box
Stack: Python, Flask
Dates: 2023
- Built a Flask app with SQLite persistence
END PROJECT

BEGIN SKILLS
Languages: Python, Java, TypeScript, SQL, Rust
Web: React, Node.js, FastAPI
Infrastructure: Docker, Linux, GitHub Actions
END SKILLS
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_fixture() {
        let profile = parse_profile(SAMPLE_PROFILE).unwrap();
        assert!(profile.preamble.contains("\\documentclass"));
        assert_eq!(profile.contact.name, "Casey Example");
        assert_eq!(profile.education.institution, "State University");
        assert_eq!(profile.experience.len(), 2);
        assert_eq!(profile.experience[0].bullets.len(), 3);
        assert_eq!(
            profile.experience[0].organization.as_deref(),
            Some("Acme Corp")
        );
        assert_eq!(profile.projects.len(), 2);
        assert_eq!(profile.projects[0].stack.as_deref(), Some("Rust, PostgreSQL, Docker"));
        assert_eq!(profile.skills.len(), 3);
        assert_eq!(profile.skills[0].0, "Languages");
        assert_eq!(profile.skills[0].1[0], "Python");
    }

    #[test]
    fn test_missing_preamble_is_configuration_error() {
        let source = "BEGIN CONTACT\nName: X\nEND CONTACT";
        let err = parse_profile(source).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)), "got {err:?}");
    }

    #[test]
    fn test_preamble_without_documentclass_is_rejected() {
        let source = SAMPLE_PROFILE.replace("\\documentclass[letterpaper,11pt]{article}", "% nothing");
        let err = parse_profile(&source).unwrap_err();
        assert!(
            err.to_string().contains("documentclass"),
            "got {err}"
        );
    }

    #[test]
    fn test_unclosed_block_is_rejected() {
        let source = "BEGIN PREAMBLE\n\\documentclass{article}\n";
        let err = parse_profile(source).unwrap_err();
        assert!(err.to_string().contains("never closed"), "got {err}");
    }

    #[test]
    fn test_mismatched_end_is_rejected() {
        let source = "BEGIN PREAMBLE\n\\documentclass{article}\nEND SKILLS\n";
        assert!(parse_profile(source).is_err());
    }

    #[test]
    fn test_contact_without_name_is_rejected() {
        let source = SAMPLE_PROFILE.replace("Name: Casey Example", "Email2: x");
        let err = parse_profile(&source).unwrap_err();
        assert!(err.to_string().contains("Name"), "got {err}");
    }

    #[tokio::test]
    async fn test_load_profile_missing_file_is_configuration_error() {
        let err = load_profile(Path::new("/nonexistent/profile.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)), "got {err:?}");
    }
}
