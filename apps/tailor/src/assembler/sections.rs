//! Section formatters — pure functions from structured data to LaTeX.
//!
//! Each formatter renders exactly one entry per input record and never
//! escapes text: escaping is applied once by the assembler, before
//! formatting, so section labels and markup commands are never mangled.

use crate::models::profile::{Contact, Education, Experience, Project};

pub fn format_heading(contact: &Contact) -> String {
    let mut links = Vec::new();
    for value in [
        contact.phone.as_deref(),
        contact.email.as_deref(),
        contact.linkedin.as_deref(),
        contact.github.as_deref(),
        contact.website.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        links.push(format!("\\small {value}"));
    }

    let mut out = String::new();
    out.push_str("\\begin{center}\n");
    out.push_str(&format!(
        "    \\textbf{{\\Huge \\scshape {}}} \\\\ \\vspace{{1pt}}\n",
        contact.name
    ));
    if !links.is_empty() {
        out.push_str(&format!("    {}\n", links.join(" $|$ ")));
    }
    out.push_str("\\end{center}");
    out
}

pub fn format_education(education: &Education) -> String {
    let mut out = String::new();
    out.push_str("\\section{Education}\n");
    out.push_str("  \\resumeSubHeadingListStart\n");
    out.push_str("    \\resumeSubheading\n");
    out.push_str(&format!(
        "      {{{}}}{{{}}}\n",
        education.institution,
        education.location.as_deref().unwrap_or("")
    ));
    out.push_str(&format!(
        "      {{{}}}{{{}}}\n",
        education.degree,
        education.dates.as_deref().unwrap_or("")
    ));
    out.push_str("  \\resumeSubHeadingListEnd");
    out
}

pub fn format_experience(entries: &[Experience]) -> String {
    let mut out = String::new();
    out.push_str("\\section{Experience}\n");
    out.push_str("  \\resumeSubHeadingListStart\n");
    for entry in entries {
        out.push_str("    \\resumeSubheading\n");
        out.push_str(&format!(
            "      {{{}}}{{{}}}\n",
            entry.name,
            entry.dates.as_deref().unwrap_or("")
        ));
        out.push_str(&format!(
            "      {{{}}}{{{}}}\n",
            entry.organization.as_deref().unwrap_or(""),
            entry.location.as_deref().unwrap_or("")
        ));
        out.push_str(&format_bullets(&entry.bullets));
    }
    out.push_str("  \\resumeSubHeadingListEnd");
    out
}

pub fn format_projects(projects: &[Project]) -> String {
    let mut out = String::new();
    out.push_str("\\section{Projects}\n");
    out.push_str("  \\resumeSubHeadingListStart\n");
    for project in projects {
        let heading = match project.stack.as_deref() {
            Some(stack) if !stack.is_empty() => {
                format!("\\textbf{{{}}} $|$ \\emph{{{}}}", project.name, stack)
            }
            _ => format!("\\textbf{{{}}}", project.name),
        };
        out.push_str(&format!(
            "    \\resumeProjectHeading\n      {{{heading}}}{{{}}}\n",
            project.dates.as_deref().unwrap_or("")
        ));
        out.push_str(&format_bullets(&project.bullets));
    }
    out.push_str("  \\resumeSubHeadingListEnd");
    out
}

pub fn format_skills(skills: &[(String, Vec<String>)]) -> String {
    let mut out = String::new();
    out.push_str("\\section{Technical Skills}\n");
    out.push_str(" \\begin{itemize}[leftmargin=0.15in, label={}]\n");
    out.push_str("    \\small{\\item{\n");
    let lines: Vec<String> = skills
        .iter()
        .map(|(category, entries)| {
            format!("     \\textbf{{{category}}}{{: {}}}", entries.join(", "))
        })
        .collect();
    out.push_str(&lines.join(" \\\\\n"));
    out.push('\n');
    out.push_str("    }}\n");
    out.push_str(" \\end{itemize}");
    out
}

fn format_bullets(bullets: &[String]) -> String {
    if bullets.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("      \\resumeItemListStart\n");
    for bullet in bullets {
        out.push_str(&format!("        \\resumeItem{{{bullet}}}\n"));
    }
    out.push_str("      \\resumeItemListEnd\n");
    out
}
