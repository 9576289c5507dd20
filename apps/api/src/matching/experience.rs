//! Experience extraction — "N years of TOPIC"-shaped phrases.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Applied independently and concatenated. Captures are read positionally:
/// group 1 is the years token, group 2 the topic.
pub const EXPERIENCE_PATTERNS: &[&str] = &[
    r"(\d+)\+?\s*years?\s*(?:of\s*)?(?:experience\s*)?(?:in\s*)?([^,\.]+)",
    r"(\d+)\+?\s*years?\s*([^,\.]+)",
    r"([^,\.]+)\s*(\d+)\+?\s*years?",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRequirement {
    pub years: u32,
    pub topic: String,
}

impl ExperienceRequirement {
    /// Human-readable form used in `missingExperience`.
    pub fn describe(&self) -> String {
        format!("{}+ years in {}", self.years, self.topic)
    }
}

#[derive(Debug)]
pub struct ExperienceExtractor {
    patterns: Vec<Regex>,
}

impl ExperienceExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            patterns: EXPERIENCE_PATTERNS
                .iter()
                .map(|p| Regex::new(p))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Every match of every pattern, duplicates included. A years token that
    /// is not a `u32` (the topic-first pattern puts free text in group 1) is
    /// skipped rather than failing the analysis.
    pub fn extract_experience(&self, text: &str) -> Vec<ExperienceRequirement> {
        let lowered = text.to_lowercase();
        let mut requirements = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.captures_iter(&lowered) {
                let (Some(years), Some(topic)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let years = years.as_str().trim();
                match years.parse::<u32>() {
                    Ok(years) => requirements.push(ExperienceRequirement {
                        years,
                        topic: topic.as_str().trim().to_string(),
                    }),
                    Err(_) => debug!(token = years, "skipping non-numeric experience years"),
                }
            }
        }

        requirements
    }
}
