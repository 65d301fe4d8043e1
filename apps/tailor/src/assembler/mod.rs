//! Document Assembler — renders tailored content plus the profile preamble
//! into a complete LaTeX document.
//!
//! Assembly escapes user data exactly once, then hands escaped structures to
//! the pure section formatters. Structural pre-checks that would make the
//! compiler fail fast are blocking; the brace-balance check is an early
//! diagnostic only, because imbalance is caught definitively at compile time.

pub mod escape;
pub mod sections;

use tracing::warn;

use crate::errors::PipelineError;
use crate::models::profile::{Contact, Education, Experience, Project};
use crate::selector::TailoredContent;
use escape::escape;
use sections::{format_education, format_experience, format_heading, format_projects, format_skills};

pub const DOCUMENT_CLASS_DIRECTIVE: &str = "\\documentclass";
pub const END_DOCUMENT_DIRECTIVE: &str = "\\end{document}";
/// Documents shorter than this cannot be a plausible one-page resume.
const MIN_DOCUMENT_CHARS: usize = 200;

/// Complete markup text ready for compilation.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    text: String,
}

impl AssembledDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Concatenates, in fixed order: preamble, `\begin{document}`, heading,
/// education, experience, projects, skills, `\end{document}`, joined with
/// blank lines. Warns (never fails) when the open/close brace imbalance
/// exceeds `brace_tolerance`.
pub fn build_document(
    preamble: &str,
    contact: &Contact,
    education: &Education,
    experience: &[Experience],
    projects: &[Project],
    skills: &[(String, Vec<String>)],
    brace_tolerance: usize,
) -> AssembledDocument {
    let contact = escape_contact(contact);
    let education = escape_education(education);
    let experience: Vec<Experience> = experience.iter().map(escape_experience).collect();
    let projects: Vec<Project> = projects.iter().map(escape_project).collect();
    let skills = escape_skills(skills);

    // Anything ahead of \documentclass (stray comments, whitespace) would
    // break the required first directive; slice from the directive itself.
    let preamble = match preamble.find(DOCUMENT_CLASS_DIRECTIVE) {
        Some(idx) => &preamble[idx..],
        None => preamble,
    };

    let parts = [
        preamble.trim_end().to_string(),
        "\\begin{document}".to_string(),
        format_heading(&contact),
        format_education(&education),
        format_experience(&experience),
        format_projects(&projects),
        format_skills(&skills),
        END_DOCUMENT_DIRECTIVE.to_string(),
    ];
    let text = parts.join("\n\n");

    let imbalance = brace_imbalance(&text);
    if imbalance.unsigned_abs() as usize > brace_tolerance {
        warn!(
            imbalance,
            tolerance = brace_tolerance,
            "assembled document has unbalanced braces; compile may fail"
        );
    }

    AssembledDocument { text }
}

/// Structural pre-checks that block compilation: the document must start
/// with the documentclass directive, end with the end-of-document directive,
/// and be long enough to plausibly be a resume.
pub fn validate_document(document: &AssembledDocument) -> Result<(), PipelineError> {
    let text = document.as_str();
    if !text.trim_start().starts_with(DOCUMENT_CLASS_DIRECTIVE) {
        return Err(PipelineError::Validation(format!(
            "document does not start with {DOCUMENT_CLASS_DIRECTIVE}"
        )));
    }
    if !text.trim_end().ends_with(END_DOCUMENT_DIRECTIVE) {
        return Err(PipelineError::Validation(format!(
            "document does not end with {END_DOCUMENT_DIRECTIVE}"
        )));
    }
    if text.len() < MIN_DOCUMENT_CHARS {
        return Err(PipelineError::Validation(format!(
            "document is {} chars, below the {MIN_DOCUMENT_CHARS}-char guardrail",
            text.len()
        )));
    }
    Ok(())
}

/// Open minus close brace count.
pub fn brace_imbalance(text: &str) -> i64 {
    let mut balance: i64 = 0;
    for ch in text.chars() {
        match ch {
            '{' => balance += 1,
            '}' => balance -= 1,
            _ => {}
        }
    }
    balance
}

fn escape_contact(contact: &Contact) -> Contact {
    Contact {
        name: escape(&contact.name),
        email: contact.email.as_deref().map(escape),
        phone: contact.phone.as_deref().map(escape),
        linkedin: contact.linkedin.as_deref().map(escape),
        github: contact.github.as_deref().map(escape),
        website: contact.website.as_deref().map(escape),
    }
}

fn escape_education(education: &Education) -> Education {
    Education {
        institution: escape(&education.institution),
        degree: escape(&education.degree),
        dates: education.dates.as_deref().map(escape),
        location: education.location.as_deref().map(escape),
    }
}

fn escape_experience(entry: &Experience) -> Experience {
    Experience {
        name: escape(&entry.name),
        organization: entry.organization.as_deref().map(escape),
        dates: entry.dates.as_deref().map(escape),
        location: entry.location.as_deref().map(escape),
        bullets: entry.bullets.iter().map(|b| escape(b)).collect(),
    }
}

fn escape_project(project: &Project) -> Project {
    Project {
        name: escape(&project.name),
        dates: project.dates.as_deref().map(escape),
        stack: project.stack.as_deref().map(escape),
        bullets: project.bullets.iter().map(|b| escape(b)).collect(),
    }
}

fn escape_skills(skills: &[(String, Vec<String>)]) -> Vec<(String, Vec<String>)> {
    skills
        .iter()
        .map(|(category, entries)| {
            (
                escape(category),
                entries.iter().map(|e| escape(e)).collect(),
            )
        })
        .collect()
}

/// Convenience wrapper: assemble directly from tailored content.
pub fn assemble(
    preamble: &str,
    contact: &Contact,
    education: &Education,
    tailored: &TailoredContent,
    brace_tolerance: usize,
) -> AssembledDocument {
    build_document(
        preamble,
        contact,
        education,
        &tailored.experience,
        &tailored.projects,
        &tailored.skills,
        brace_tolerance,
    )
}
