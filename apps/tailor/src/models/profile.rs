//! Candidate background model — read-only state for the duration of a run.

use serde::{Deserialize, Serialize};

/// Contact block rendered into the document heading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub dates: Option<String>,
    pub location: Option<String>,
}

/// A work experience entry. Bullets are the unit of relevance scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub name: String,
    pub organization: Option<String>,
    pub dates: Option<String>,
    pub location: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub dates: Option<String>,
    /// Technology-stack string, e.g. "Rust, Tokio, PostgreSQL".
    pub stack: Option<String>,
    pub bullets: Vec<String>,
}

/// The candidate's static background, parsed once at startup.
/// Safe to share across concurrent job-processing tasks — nothing mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    /// Raw LaTeX preamble from the profile source. Must carry
    /// `\documentclass`; validated at load time.
    pub preamble: String,
    pub contact: Contact,
    pub education: Education,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    /// Skill category → ordered skill names. A `Vec` of pairs (not a map)
    /// so category order survives serialization.
    pub skills: Vec<(String, Vec<String>)>,
}
