//! Match orchestrator — runs one resume/job analysis end to end.
//!
//! This is the single failure-containment boundary: `analyze` never returns an
//! error. Any stage failure, a panicking backend included, becomes a
//! zero-score result with a diagnostic in `other_missing`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::matching::advice::{advise, MatchAnalysis};
use crate::matching::experience::ExperienceExtractor;
use crate::matching::fusion::{round2, score};
use crate::matching::gap::{
    find_missing_experience, find_missing_skills, find_skill_matches, SkillVariationTable,
};
use crate::matching::lexicon::SkillLexicon;
use crate::matching::similarity::SemanticScorer;
use crate::matching::skills::{SkillExtractor, SkillSet};
use crate::nlp::{Embedder, NlpError, PhraseRecognizer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub match_score: f64,
    pub matched_skills: SkillSet,
    pub missing_skills: SkillSet,
    pub missing_experience: Vec<String>,
    /// Diagnostic slot; only populated when the analysis degraded.
    pub other_missing: Vec<String>,
    pub analysis: MatchAnalysis,
}

impl MatchResult {
    /// The fixed shape returned when an analysis could not complete.
    pub fn degraded(reason: &str) -> Self {
        Self {
            match_score: 0.0,
            matched_skills: SkillSet::new(),
            missing_skills: SkillSet::new(),
            missing_experience: vec![],
            other_missing: vec![format!("Analysis error: {reason}")],
            analysis: advise(0.0, &SkillSet::new(), &[]),
        }
    }
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("skill extraction failed: {0}")]
    SkillExtraction(#[from] NlpError),
}

/// Owns every read-only piece of matching state. Built once at startup and
/// shared across requests behind an `Arc`.
pub struct MatchOrchestrator {
    skills: SkillExtractor,
    experience: ExperienceExtractor,
    scorer: SemanticScorer,
    variations: SkillVariationTable,
}

impl MatchOrchestrator {
    pub fn new(
        recognizer: Arc<dyn PhraseRecognizer>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            skills: SkillExtractor::new(SkillLexicon::new()?, recognizer),
            experience: ExperienceExtractor::new()?,
            scorer: SemanticScorer::new(embedder),
            variations: SkillVariationTable::default(),
        })
    }

    /// Backend names, for startup logging.
    pub fn backends(&self) -> (&str, &str) {
        (self.skills.recognizer_name(), self.scorer.embedder_name())
    }

    pub async fn extract_skills(&self, text: &str) -> Result<SkillSet, NlpError> {
        self.skills.extract_skills(text).await
    }

    pub async fn analyze(&self, resume_text: &str, job_description: &str) -> MatchResult {
        let analysis_id = Uuid::new_v4();
        let span = info_span!("analysis", %analysis_id);

        async move {
            info!(
                resume_len = resume_text.len(),
                job_len = job_description.len(),
                "Starting job match analysis"
            );

            let outcome = AssertUnwindSafe(self.try_analyze(resume_text, job_description))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(result)) => {
                    info!(match_score = result.match_score, "Analysis completed");
                    result
                }
                Ok(Err(e)) => {
                    error!("Error in job match analysis: {e}");
                    MatchResult::degraded(&e.to_string())
                }
                Err(payload) => {
                    let reason = panic_message(&*payload);
                    error!("Job match analysis panicked: {reason}");
                    MatchResult::degraded(&reason)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn try_analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<MatchResult, MatchError> {
        let resume_skills = self.skills.extract_skills(resume_text).await?;
        let job_skills = self.skills.extract_skills(job_description).await?;

        let job_experience = self.experience.extract_experience(job_description);

        let similarity = self.scorer.similarity(resume_text, job_description).await;
        if similarity.is_fallback() {
            warn!("Scoring without semantic similarity: {similarity:?}");
        }

        let matched_skills = find_skill_matches(&self.variations, &resume_skills, &job_skills);
        let missing_skills = find_missing_skills(&self.variations, &resume_skills, &job_skills);

        let resume_experience = self.experience.extract_experience(resume_text);
        let missing_experience = find_missing_experience(&resume_experience, &job_experience);

        let match_score = score(
            similarity.value(),
            &matched_skills,
            &missing_skills,
            &job_skills,
        );

        let match_score = round2(match_score);
        let analysis = advise(match_score, &missing_skills, &missing_experience);

        Ok(MatchResult {
            match_score,
            matched_skills,
            missing_skills,
            missing_experience,
            other_missing: vec![],
            analysis,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {message}")
    } else {
        "panic in analysis backend".to_string()
    }
}
