//! Skill lexicon — the static skill taxonomy, kept as data and compiled once.

use regex::Regex;
use tracing::debug;

/// Category name → surface-form patterns. Patterns run against lowercased text.
pub const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "programming_languages",
        &[
            r"\b(python|java|javascript|typescript|c\+\+|c#|go|rust|swift|kotlin|scala|php|ruby|r|matlab|perl|bash|shell)\b",
            r"\b(html|css|sql|nosql|mongodb|postgresql|mysql|oracle|sqlite)\b",
        ],
    ),
    (
        "frameworks_libraries",
        &[
            r"\b(spring|spring boot|django|flask|fastapi|express|react|angular|vue|node\.js|jquery|bootstrap|tailwind)\b",
            r"\b(tensorflow|pytorch|scikit-learn|pandas|numpy|matplotlib|seaborn|plotly)\b",
            r"\b(docker|kubernetes|jenkins|git|github|gitlab|bitbucket|jira|confluence)\b",
        ],
    ),
    (
        "cloud_platforms",
        &[
            r"\b(aws|amazon web services|azure|google cloud|gcp|heroku|digitalocean|linode|vultr)\b",
            r"\b(ec2|s3|lambda|rds|dynamodb|cloudfront|route53|vpc|iam|sagemaker)\b",
        ],
    ),
    (
        "databases",
        &[r"\b(mysql|postgresql|mongodb|redis|cassandra|elasticsearch|dynamodb|firebase|supabase)\b"],
    ),
    (
        "methodologies",
        &[r"\b(agile|scrum|kanban|waterfall|devops|ci/cd|tdd|bdd|lean|six sigma)\b"],
    ),
    (
        "soft_skills",
        &[
            r"\b(leadership|communication|teamwork|problem solving|critical thinking|time management)\b",
            r"\b(project management|collaboration|mentoring|presentation|negotiation|adaptability)\b",
        ],
    ),
];

/// A named category with its compiled matchers, in declaration order.
#[derive(Debug)]
pub struct SkillCategory {
    pub name: &'static str,
    pub patterns: Vec<Regex>,
}

#[derive(Debug)]
pub struct SkillLexicon {
    categories: Vec<SkillCategory>,
}

impl SkillLexicon {
    pub fn new() -> Result<Self, regex::Error> {
        Self::from_table(SKILL_CATEGORIES)
    }

    pub fn from_table(table: &[(&'static str, &[&str])]) -> Result<Self, regex::Error> {
        let categories = table
            .iter()
            .map(|&(name, patterns)| -> Result<SkillCategory, regex::Error> {
                Ok(SkillCategory {
                    name,
                    patterns: patterns
                        .iter()
                        .map(|p| Regex::new(p))
                        .collect::<Result<_, _>>()?,
                })
            })
            .collect::<Result<_, _>>()?;

        let lexicon = Self { categories };
        let names: Vec<&str> = lexicon.categories().iter().map(|c| c.name).collect();
        debug!(?names, "Skill lexicon compiled");
        Ok(lexicon)
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    /// Every non-overlapping match of every pattern, in pattern order.
    /// `text` must already be lowercased.
    pub fn find_all<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.categories
            .iter()
            .flat_map(|c| c.patterns.iter())
            .flat_map(move |p| p.find_iter(text).map(|m| m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(text: &str) -> Vec<String> {
        let lexicon = SkillLexicon::new().unwrap();
        lexicon.find_all(text).map(String::from).collect()
    }

    #[test]
    fn test_lexicon_compiles_all_categories() {
        let lexicon = SkillLexicon::new().unwrap();
        let names: Vec<&str> = lexicon.categories().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "programming_languages",
                "frameworks_libraries",
                "cloud_platforms",
                "databases",
                "methodologies",
                "soft_skills"
            ]
        );
        assert!(lexicon.categories().iter().all(|c| !c.patterns.is_empty()));
    }

    #[test]
    fn test_word_boundaries_are_respected() {
        let found = matches("pythonic gopher javascript");
        assert_eq!(found, vec!["javascript"]);
    }

    #[test]
    fn test_multi_word_and_punctuated_skills() {
        let found = matches("node.js, ci/cd and google cloud with six sigma");
        assert!(found.contains(&"node.js".to_string()));
        assert!(found.contains(&"ci/cd".to_string()));
        assert!(found.contains(&"google cloud".to_string()));
        assert!(found.contains(&"six sigma".to_string()));
    }

    #[test]
    fn test_skill_in_two_categories_matches_twice() {
        // mysql is listed under languages and databases.
        let found = matches("mysql");
        assert_eq!(found, vec!["mysql", "mysql"]);
    }

    #[test]
    fn test_alternation_prefers_first_listed_form() {
        // "spring" precedes "spring boot" in the alternation, so the shorter form wins.
        assert_eq!(matches("spring boot"), vec!["spring"]);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let table: &[(&'static str, &[&str])] = &[("broken", &[r"\b(unclosed"])];
        assert!(SkillLexicon::from_table(table).is_err());
    }
}
