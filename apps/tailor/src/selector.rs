//! Content Selector — chooses and ranks which background fragments to
//! surface for one posting.
//!
//! Selection and reordering rather than deletion-then-regeneration: output
//! stays deterministic and bounded in size (fixed entry/bullet counts)
//! however verbose the raw background is, which the one-page document
//! downstream depends on. All operations here are pure functions over
//! immutable inputs.

use crate::models::profile::{CandidateProfile, Experience, Project};
use crate::scoring::{keyword_hits, KeywordSet};

/// Per-section selection caps. Policy, not hard-wired constants.
#[derive(Debug, Clone)]
pub struct SelectionLimits {
    pub experiences: usize,
    pub projects: usize,
    pub bullets_per_entry: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            experiences: 3,
            projects: 3,
            bullets_per_entry: 4,
        }
    }
}

/// The selected and reordered subset of the profile chosen for one posting.
#[derive(Debug, Clone)]
pub struct TailoredContent {
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub skills: Vec<(String, Vec<String>)>,
}

/// Scores every bullet by keyword hit count, sorts descending (stable on
/// ties, preserving original order), and returns the top `max_n`.
///
/// With an empty keyword set no ranking is possible; the first `max_n`
/// bullets are returned unscored so output stays deterministic and bounded.
pub fn select_bullets(bullets: &[String], keywords: &KeywordSet, max_n: usize) -> Vec<String> {
    if keywords.is_empty() {
        return bullets.iter().take(max_n).cloned().collect();
    }
    let mut scored: Vec<(usize, &String)> = bullets
        .iter()
        .map(|b| (keyword_hits(b, keywords), b))
        .collect();
    // sort_by is stable: ties keep original bullet order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(max_n).map(|(_, b)| b.clone()).collect()
}

/// Ranks projects by keyword hits over the concatenation of the tech-stack
/// string and the bullets, and returns the top `max_n` records unmodified.
/// Bullet trimming inside chosen projects happens later, in [`tailor`].
pub fn select_projects(projects: &[Project], keywords: &KeywordSet, max_n: usize) -> Vec<Project> {
    rank_by(projects, keywords, max_n, |p| {
        let mut text = p.stack.clone().unwrap_or_default();
        text.push(' ');
        text.push_str(&p.bullets.join(" "));
        text
    })
}

/// Ranks experience entries by keyword hits over their concatenated bullets
/// and returns the top `max_n` unmodified. Same rule shape as
/// [`select_projects`] so both entry kinds rank the same way.
pub fn select_experiences(
    experiences: &[Experience],
    keywords: &KeywordSet,
    max_n: usize,
) -> Vec<Experience> {
    rank_by(experiences, keywords, max_n, |e| e.bullets.join(" "))
}

fn rank_by<T: Clone>(
    entries: &[T],
    keywords: &KeywordSet,
    max_n: usize,
    text_of: impl Fn(&T) -> String,
) -> Vec<T> {
    if keywords.is_empty() {
        return entries.iter().take(max_n).cloned().collect();
    }
    let mut scored: Vec<(usize, &T)> = entries
        .iter()
        .map(|e| (keyword_hits(&text_of(e), keywords), e))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(max_n).map(|(_, e)| e.clone()).collect()
}

/// Reorders each category's skill list so keyword-matching entries sort
/// first (binary match/no-match, ties preserving original order). Never
/// drops a skill.
pub fn reorder_skills(
    skills: &[(String, Vec<String>)],
    keywords: &KeywordSet,
) -> Vec<(String, Vec<String>)> {
    skills
        .iter()
        .map(|(category, entries)| {
            let mut ranked: Vec<&String> = entries.iter().collect();
            ranked.sort_by_key(|skill| {
                let lower = skill.to_lowercase();
                // matches sort first: false < true, so invert
                !keywords.iter().any(|kw| lower.contains(kw))
            });
            (
                category.clone(),
                ranked.into_iter().cloned().collect(),
            )
        })
        .collect()
}

/// Composes the full tailored content for one posting: bounded experience
/// and project entries (bullets trimmed per entry) and reordered skills.
pub fn tailor(
    profile: &CandidateProfile,
    keywords: &KeywordSet,
    limits: &SelectionLimits,
) -> TailoredContent {
    let experience = select_experiences(&profile.experience, keywords, limits.experiences)
        .into_iter()
        .map(|mut e| {
            e.bullets = select_bullets(&e.bullets, keywords, limits.bullets_per_entry);
            e
        })
        .collect();

    let projects = select_projects(&profile.projects, keywords, limits.projects)
        .into_iter()
        .map(|mut p| {
            p.bullets = select_bullets(&p.bullets, keywords, limits.bullets_per_entry);
            p
        })
        .collect();

    TailoredContent {
        experience,
        projects,
        skills: reorder_skills(&profile.skills, keywords),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullets(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn project(name: &str, stack: Option<&str>, bullet_texts: &[&str]) -> Project {
        Project {
            name: name.to_string(),
            dates: None,
            stack: stack.map(str::to_string),
            bullets: bullets(bullet_texts),
        }
    }

    #[test]
    fn test_keyword_bullet_outscores_sibling_and_wins_at_max_one() {
        let keywords = KeywordSet::from_terms(["react", "postgresql", "docker"]);
        let entry = bullets(&[
            "Organized the team offsite and onboarding docs",
            "Shipped a React dashboard deployed with Docker",
        ]);
        let selected = select_bullets(&entry, &keywords, 1);
        assert_eq!(selected.len(), 1);
        assert!(selected[0].contains("React"), "got {:?}", selected);
    }

    #[test]
    fn test_select_bullets_returns_min_of_n_and_len() {
        let keywords = KeywordSet::from_terms(["react"]);
        let entry = bullets(&["a", "b"]);
        assert_eq!(select_bullets(&entry, &keywords, 5).len(), 2);
        assert_eq!(select_bullets(&entry, &keywords, 1).len(), 1);
        assert_eq!(select_bullets(&[], &keywords, 3).len(), 0);
    }

    #[test]
    fn test_select_bullets_empty_keywords_takes_first_n_in_order() {
        let entry = bullets(&["first", "second", "third"]);
        let selected = select_bullets(&entry, &KeywordSet::default(), 2);
        assert_eq!(selected, bullets(&["first", "second"]));
    }

    #[test]
    fn test_select_bullets_ties_preserve_original_order() {
        let keywords = KeywordSet::from_terms(["docker"]);
        let entry = bullets(&["alpha docker", "beta docker", "gamma docker"]);
        let selected = select_bullets(&entry, &keywords, 3);
        assert_eq!(selected, entry, "equal scores must keep input order");
    }

    #[test]
    fn test_select_projects_scores_stack_string() {
        let keywords = KeywordSet::from_terms(["rust", "postgresql"]);
        let projects = vec![
            project("Recipe Box", Some("Python, Flask"), &["Built a Flask app"]),
            project("Trail Tracker", Some("Rust, PostgreSQL"), &["Designed an API"]),
        ];
        let selected = select_projects(&projects, &keywords, 1);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Trail Tracker");
        // records come back unmodified — bullets untouched at this stage
        assert_eq!(selected[0].bullets.len(), 1);
    }

    #[test]
    fn test_reorder_skills_matches_first_and_never_drops() {
        let keywords = KeywordSet::from_terms(["react", "docker"]);
        let skills = vec![(
            "Web".to_string(),
            vec!["Angular".to_string(), "React".to_string(), "Vue".to_string()],
        )];
        let reordered = reorder_skills(&skills, &keywords);
        assert_eq!(reordered[0].1, vec!["React", "Angular", "Vue"]);
        assert_eq!(
            reordered[0].1.len(),
            skills[0].1.len(),
            "reordering must never drop skills"
        );
    }

    #[test]
    fn test_reorder_skills_ties_preserve_original_order() {
        let skills = vec![(
            "Languages".to_string(),
            vec!["Python".to_string(), "Java".to_string()],
        )];
        let reordered = reorder_skills(&skills, &KeywordSet::default());
        assert_eq!(reordered[0].1, vec!["Python", "Java"]);
    }

    #[test]
    fn test_tailor_bounds_every_section() {
        let profile = crate::store::parse_profile(crate::store::SAMPLE_PROFILE).unwrap();
        let keywords = KeywordSet::from_terms(["react", "docker", "postgresql"]);
        let limits = SelectionLimits {
            experiences: 1,
            projects: 1,
            bullets_per_entry: 2,
        };
        let tailored = tailor(&profile, &keywords, &limits);
        assert_eq!(tailored.experience.len(), 1);
        assert_eq!(tailored.projects.len(), 1);
        assert!(tailored.experience[0].bullets.len() <= 2);
        assert!(tailored.projects[0].bullets.len() <= 2);
        // the keyword-heavy Acme internship must win over the TA role
        assert_eq!(tailored.experience[0].name, "Software Engineering Intern");
        assert_eq!(tailored.skills.len(), profile.skills.len());
    }
}
