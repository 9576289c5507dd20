//! Gap analysis — matched skills, missing skills and unmet experience.
//!
//! Fuzzy matching goes through a fixed canonical → variations table plus
//! substring containment. It is deliberately permissive ("python" also
//! matches "pythonic"); keep it that way, downstream scores depend on it.

use std::collections::{BTreeMap, BTreeSet};

use crate::matching::experience::ExperienceRequirement;
use crate::matching::skills::SkillSet;

pub const SKILL_VARIATIONS: &[(&str, &[&str])] = &[
    ("java", &["j2ee", "jee", "spring", "hibernate", "maven", "gradle"]),
    (
        "javascript",
        &["js", "es6", "node", "react", "angular", "vue", "typescript"],
    ),
    (
        "python",
        &["django", "flask", "fastapi", "pandas", "numpy", "scikit-learn"],
    ),
    (
        "aws",
        &["amazon web services", "ec2", "s3", "lambda", "rds", "dynamodb"],
    ),
    ("docker", &["containerization", "kubernetes", "k8s", "containers"]),
    (
        "sql",
        &["mysql", "postgresql", "oracle", "sql server", "database"],
    ),
    ("git", &["github", "gitlab", "bitbucket", "version control"]),
    (
        "agile",
        &["scrum", "kanban", "sprint", "backlog", "user stories"],
    ),
];

/// Canonical skill → its aliases. Read-only after construction.
#[derive(Debug, Clone)]
pub struct SkillVariationTable {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl Default for SkillVariationTable {
    fn default() -> Self {
        Self::from_table(SKILL_VARIATIONS)
    }
}

impl SkillVariationTable {
    pub fn from_table(table: &[(&str, &[&str])]) -> Self {
        let entries = table
            .iter()
            .map(|(canonical, variations)| {
                (
                    canonical.to_lowercase(),
                    variations.iter().map(|v| v.to_lowercase()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    /// True when `skill` is a listed variation of `canonical` or contains it.
    fn relates(canonical: &str, variations: &BTreeSet<String>, skill: &str) -> bool {
        variations.contains(skill) || skill.contains(canonical)
    }
}

fn case_fold(skills: &SkillSet) -> BTreeSet<String> {
    skills.iter().map(|s| s.to_lowercase()).collect()
}

/// Direct intersection plus every resume skill that shares a variation entry
/// with at least one job skill. May include resume skills that are not job
/// skills themselves (e.g. "django" matched through "python").
pub fn find_skill_matches(
    variations: &SkillVariationTable,
    resume_skills: &SkillSet,
    job_skills: &SkillSet,
) -> SkillSet {
    let resume = case_fold(resume_skills);
    let job = case_fold(job_skills);

    let mut matched: SkillSet = resume.intersection(&job).cloned().collect();

    for skill in &resume {
        for (canonical, aliases) in &variations.entries {
            if !SkillVariationTable::relates(canonical, aliases, skill) {
                continue;
            }
            if job
                .iter()
                .any(|j| SkillVariationTable::relates(canonical, aliases, j))
            {
                matched.insert(skill.clone());
            }
        }
    }

    matched
}

/// Job skills absent from the direct + fuzzy match set.
pub fn find_missing_skills(
    variations: &SkillVariationTable,
    resume_skills: &SkillSet,
    job_skills: &SkillSet,
) -> SkillSet {
    let matched = find_skill_matches(variations, resume_skills, job_skills);
    missing_from(&matched, job_skills)
}

/// `job_skills − matched`, for callers that already hold the match set.
pub fn missing_from(matched: &SkillSet, job_skills: &SkillSet) -> SkillSet {
    case_fold(job_skills)
        .into_iter()
        .filter(|j| !matched.contains(j))
        .collect()
}

/// A job requirement is met when some resume requirement's topic contains the
/// job topic and states at least as many years.
pub fn find_missing_experience(
    resume_experience: &[ExperienceRequirement],
    job_experience: &[ExperienceRequirement],
) -> Vec<String> {
    job_experience
        .iter()
        .filter(|job| {
            !resume_experience
                .iter()
                .any(|r| r.topic.contains(job.topic.as_str()) && r.years >= job.years)
        })
        .map(ExperienceRequirement::describe)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> SkillSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn req(years: u32, topic: &str) -> ExperienceRequirement {
        ExperienceRequirement {
            years,
            topic: topic.to_string(),
        }
    }

    fn table() -> SkillVariationTable {
        SkillVariationTable::default()
    }

    #[test]
    fn test_direct_match_is_case_insensitive() {
        let matched = find_skill_matches(&table(), &set(&["Rust", "go"]), &set(&["rust"]));
        assert_eq!(matched, set(&["rust"]));
    }

    #[test]
    fn test_variation_matches_canonical_job_skill() {
        // Resume lists a Python framework; the job asks for python.
        let matched = find_skill_matches(&table(), &set(&["django"]), &set(&["python"]));
        assert_eq!(matched, set(&["django"]));
        // The match set holds resume names, so a fuzzy match does not remove
        // the canonical job skill from the missing set.
        assert_eq!(
            find_missing_skills(&table(), &set(&["django"]), &set(&["python"])),
            set(&["python"])
        );
    }

    #[test]
    fn test_substring_containment_is_permissive() {
        let matched = find_skill_matches(&table(), &set(&["python"]), &set(&["pythonic"]));
        assert_eq!(matched, set(&["python"]));
    }

    #[test]
    fn test_matched_resume_skill_need_not_be_a_job_skill() {
        let matched = find_skill_matches(
            &table(),
            &set(&["python", "django"]),
            &set(&["python", "python developer"]),
        );
        assert_eq!(matched, set(&["django", "python"]));
        let missing = missing_from(&matched, &set(&["python", "python developer"]));
        assert_eq!(missing, set(&["python developer"]));
    }

    #[test]
    fn test_unrelated_skills_do_not_match() {
        let resume = set(&["java", "java developer"]);
        let job = set(&["react", "aws", "2 years"]);
        assert!(find_skill_matches(&table(), &resume, &job).is_empty());
        assert_eq!(find_missing_skills(&table(), &resume, &job), job);
    }

    #[test]
    fn test_java_matches_javascript_job_by_substring() {
        // "javascript" contains "java", so the java entry links the two.
        let matched = find_skill_matches(&table(), &set(&["java"]), &set(&["javascript"]));
        assert_eq!(matched, set(&["java"]));
    }

    #[test]
    fn test_missing_and_matched_are_disjoint() {
        let resume = set(&["python", "docker", "scrum"]);
        let job = set(&["python", "kubernetes", "agile", "terraform"]);
        let matched = find_skill_matches(&table(), &resume, &job);
        let missing = find_missing_skills(&table(), &resume, &job);
        assert!(matched.is_disjoint(&missing));
        assert_eq!(missing, set(&["agile", "kubernetes", "terraform"]));
    }

    #[test]
    fn test_empty_job_skills_match_nothing() {
        assert!(find_skill_matches(&table(), &set(&["python"]), &SkillSet::new()).is_empty());
        assert!(find_missing_skills(&table(), &set(&["python"]), &SkillSet::new()).is_empty());
    }

    #[test]
    fn test_experience_satisfied_by_containing_topic() {
        let resume = vec![req(5, "python django experience")];
        let job = vec![req(3, "experience"), req(3, "python")];
        assert!(find_missing_experience(&resume, &job).is_empty());
    }

    #[test]
    fn test_experience_insufficient_years() {
        let resume = vec![req(2, "rust")];
        let job = vec![req(5, "rust")];
        assert_eq!(find_missing_experience(&resume, &job), vec!["5+ years in rust"]);
    }

    #[test]
    fn test_experience_later_resume_entry_can_satisfy() {
        let resume = vec![req(1, "rust"), req(6, "rust and c++")];
        let job = vec![req(5, "rust")];
        assert!(find_missing_experience(&resume, &job).is_empty());
    }

    #[test]
    fn test_experience_missing_topic_keeps_duplicates() {
        let job = vec![req(2, "kafka"), req(2, "kafka")];
        assert_eq!(
            find_missing_experience(&[], &job),
            vec!["2+ years in kafka", "2+ years in kafka"]
        );
    }
}
