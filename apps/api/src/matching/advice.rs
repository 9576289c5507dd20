//! Match advice — a verdict for the score tier plus concrete next steps.

use serde::{Deserialize, Serialize};

use crate::matching::skills::SkillSet;

/// How many missing skills the "Prioritize learning" line names.
const PRIORITY_SKILLS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Excellent,
    Good,
    Moderate,
    Low,
}

impl MatchTier {
    /// Tiers start at 80, 60 and 40; each bound is inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            MatchTier::Excellent
        } else if score >= 60.0 {
            MatchTier::Good
        } else if score >= 40.0 {
            MatchTier::Moderate
        } else {
            MatchTier::Low
        }
    }

    fn verdict(self) -> &'static str {
        match self {
            MatchTier::Excellent => {
                "Excellent match! Your profile strongly aligns with the job requirements."
            }
            MatchTier::Good => {
                "Good match. You have many of the required skills but some gaps exist."
            }
            MatchTier::Moderate => {
                "Moderate match. Consider developing additional skills before applying."
            }
            MatchTier::Low => "Low match. This role may require significant skill development.",
        }
    }

    fn base_recommendations(self) -> [&'static str; 2] {
        match self {
            MatchTier::Excellent => [
                "Highlight your matched skills prominently in your application",
                "Prepare to discuss your experience with the identified technologies",
            ],
            MatchTier::Good => [
                "Focus on learning the missing skills identified",
                "Emphasize transferable skills and experience",
            ],
            MatchTier::Moderate => [
                "Invest time in learning the missing technical skills",
                "Consider similar roles with fewer requirements",
            ],
            MatchTier::Low => [
                "Focus on building the core missing skills first",
                "Consider entry-level positions or internships",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalysis {
    pub overall_match: String,
    pub recommendations: Vec<String>,
}

/// Builds the advice block for a rounded match score. Missing skills are
/// named in set order, so the first three alphabetically.
pub fn advise(
    match_score: f64,
    missing_skills: &SkillSet,
    missing_experience: &[String],
) -> MatchAnalysis {
    let tier = MatchTier::from_score(match_score);
    let mut recommendations: Vec<String> = tier
        .base_recommendations()
        .iter()
        .map(|r| r.to_string())
        .collect();

    if !missing_experience.is_empty() {
        recommendations.push(format!("Experience gaps: {}", missing_experience.join(", ")));
    }

    if !missing_skills.is_empty() {
        let priority: Vec<&str> = missing_skills
            .iter()
            .take(PRIORITY_SKILLS)
            .map(String::as_str)
            .collect();
        recommendations.push(format!("Prioritize learning: {}", priority.join(", ")));
    }

    MatchAnalysis {
        overall_match: tier.verdict().to_string(),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> SkillSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        assert_eq!(MatchTier::from_score(100.0), MatchTier::Excellent);
        assert_eq!(MatchTier::from_score(80.0), MatchTier::Excellent);
        assert_eq!(MatchTier::from_score(79.99), MatchTier::Good);
        assert_eq!(MatchTier::from_score(60.0), MatchTier::Good);
        assert_eq!(MatchTier::from_score(59.99), MatchTier::Moderate);
        assert_eq!(MatchTier::from_score(40.0), MatchTier::Moderate);
        assert_eq!(MatchTier::from_score(39.99), MatchTier::Low);
        assert_eq!(MatchTier::from_score(0.0), MatchTier::Low);
    }

    #[test]
    fn test_excellent_match_without_gaps() {
        let analysis = advise(85.0, &SkillSet::new(), &[]);
        assert!(analysis.overall_match.starts_with("Excellent match!"));
        assert_eq!(
            analysis.recommendations,
            vec![
                "Highlight your matched skills prominently in your application",
                "Prepare to discuss your experience with the identified technologies",
            ]
        );
    }

    #[test]
    fn test_each_tier_has_its_own_verdict() {
        let empty = SkillSet::new();
        assert!(advise(60.0, &empty, &[]).overall_match.starts_with("Good match."));
        assert!(advise(40.0, &empty, &[]).overall_match.starts_with("Moderate match."));
        assert!(advise(39.99, &empty, &[]).overall_match.starts_with("Low match."));
        assert_eq!(
            advise(10.0, &empty, &[]).recommendations[1],
            "Consider entry-level positions or internships"
        );
    }

    #[test]
    fn test_gaps_are_appended_after_tier_advice() {
        let missing = set(&["terraform", "aws", "kafka", "go"]);
        let experience = vec!["5+ years in rust".to_string(), "2+ years in go".to_string()];
        let analysis = advise(55.0, &missing, &experience);

        assert_eq!(analysis.recommendations.len(), 4);
        assert_eq!(
            analysis.recommendations[2],
            "Experience gaps: 5+ years in rust, 2+ years in go"
        );
        assert_eq!(
            analysis.recommendations[3],
            "Prioritize learning: aws, go, kafka"
        );
    }

    #[test]
    fn test_fewer_than_three_missing_skills() {
        let analysis = advise(20.0, &set(&["docker"]), &[]);
        assert_eq!(
            analysis.recommendations.last().map(String::as_str),
            Some("Prioritize learning: docker")
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(advise(90.0, &SkillSet::new(), &[])).unwrap();
        assert!(value["overallMatch"].is_string());
        assert_eq!(value["recommendations"].as_array().map(Vec::len), Some(2));
    }
}
