//! Score fusion — semantic similarity and skill coverage into one 0–100 score.
//!
//! The weights are fixed for output compatibility with existing consumers.

use crate::matching::skills::SkillSet;

const SKILL_MATCH_WEIGHT: f64 = 0.6;
const MISSING_PENALTY_WEIGHT: f64 = 0.4;
const SEMANTIC_WEIGHT: f64 = 0.4;

/// Fused match score in [0, 100].
///
/// With no job skills the skill terms are undefined and the score is the
/// semantic similarity alone, scaled to 100.
pub fn score(
    semantic_similarity: f64,
    matched_skills: &SkillSet,
    missing_skills: &SkillSet,
    job_skills: &SkillSet,
) -> f64 {
    if job_skills.is_empty() {
        return (semantic_similarity * 100.0).clamp(0.0, 100.0);
    }

    let total = job_skills.len() as f64;
    let skill_match_ratio = matched_skills.len() as f64 / total;
    let missing_penalty = missing_skills.len() as f64 / total;

    let skill_score =
        SKILL_MATCH_WEIGHT * skill_match_ratio - MISSING_PENALTY_WEIGHT * missing_penalty;
    let semantic_score = SEMANTIC_WEIGHT * semantic_similarity;

    ((semantic_score + skill_score) * 100.0).clamp(0.0, 100.0)
}

/// Rounds to two decimals for the response payload.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A set of `n` distinct placeholder skills; only the sizes matter here.
    fn skills(n: usize) -> SkillSet {
        (0..n).map(|i| format!("skill-{i}")).collect()
    }

    fn score_n(sim: f64, matched: usize, missing: usize, total: usize) -> f64 {
        score(sim, &skills(matched), &skills(missing), &skills(total))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_no_job_skills_uses_semantic_only() {
        assert!(approx(score_n(0.73, 0, 0, 0), 73.0));
        assert!(approx(score_n(0.73, 5, 0, 0), 73.0));
    }

    #[test]
    fn test_no_job_skills_is_clamped() {
        assert_eq!(score_n(-0.2, 0, 0, 0), 0.0);
    }

    #[test]
    fn test_weighted_combination() {
        // 0.4*0.5 + 0.6*(2/4) - 0.4*(2/4) = 0.2 + 0.3 - 0.2 = 0.3
        assert!(approx(score_n(0.5, 2, 2, 4), 30.0));
    }

    #[test]
    fn test_full_coverage() {
        // 0.4*0.9 + 0.6*1 - 0 = 0.96
        assert!(approx(score_n(0.9, 3, 0, 3), 96.0));
    }

    #[test]
    fn test_heavy_penalty_clamps_to_zero() {
        assert_eq!(score_n(0.1, 0, 5, 5), 0.0);
    }

    #[test]
    fn test_fuzzy_over_match_clamps_to_hundred() {
        // Fuzzy matching can report more matches than job skills.
        assert_eq!(score_n(1.0, 10, 0, 2), 100.0);
    }

    #[test]
    fn test_score_always_bounded() {
        for sim in [-1.0, -0.3, 0.0, 0.4, 1.0] {
            for matched in 0..6 {
                for missing in 0..6 {
                    for total in 0..6 {
                        let s = score_n(sim, matched, missing, total);
                        assert!((0.0..=100.0).contains(&s), "score {s} out of bounds");
                    }
                }
            }
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(71.23456), 71.23);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(100.0), 100.0);
    }
}
