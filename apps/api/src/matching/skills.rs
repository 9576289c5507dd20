//! Skill extraction — lexicon patterns unioned with recognizer entities and phrases.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::matching::lexicon::SkillLexicon;
use crate::nlp::{Analysis, NlpError, PhraseRecognizer};

/// Lowercased, trimmed, deduplicated skill strings of 2–50 characters.
/// Ordered only so responses are stable.
pub type SkillSet = BTreeSet<String>;

const MIN_SKILL_CHARS: usize = 2;
const MAX_SKILL_CHARS: usize = 50;
/// Noun phrases longer than this are sentences, not skills.
const MAX_PHRASE_WORDS: usize = 3;

/// Case-folds and trims a candidate; `None` if it falls outside the length window.
pub fn normalize_skill(candidate: &str) -> Option<String> {
    let skill = candidate.to_lowercase().trim().to_string();
    let chars = skill.chars().count();
    (MIN_SKILL_CHARS..=MAX_SKILL_CHARS)
        .contains(&chars)
        .then_some(skill)
}

/// Every lexicon match in the lowercased text.
pub fn lexicon_candidates(lexicon: &SkillLexicon, text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lexicon.find_all(&lowered).map(String::from).collect()
}

/// Skill-bearing entities (organization / product / location) and short phrases.
pub fn recognizer_candidates(analysis: &Analysis) -> Vec<String> {
    let entities = analysis
        .entities
        .iter()
        .filter(|e| e.label.is_skill_bearing())
        .map(|e| e.text.clone());
    let phrases = analysis
        .phrases
        .iter()
        .filter(|p| p.split_whitespace().count() <= MAX_PHRASE_WORDS)
        .cloned();
    entities.chain(phrases).collect()
}

/// Folds candidate lists into a `SkillSet`, dropping out-of-bounds strings.
pub fn to_skill_set<I>(candidates: I) -> SkillSet
where
    I: IntoIterator<Item = String>,
{
    candidates
        .into_iter()
        .filter_map(|c| normalize_skill(&c))
        .collect()
}

/// Lexicon + recognizer skill extractor. Built once at startup.
pub struct SkillExtractor {
    lexicon: SkillLexicon,
    recognizer: Arc<dyn PhraseRecognizer>,
}

impl SkillExtractor {
    pub fn new(lexicon: SkillLexicon, recognizer: Arc<dyn PhraseRecognizer>) -> Self {
        Self {
            lexicon,
            recognizer,
        }
    }

    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Recognizer failures propagate; the orchestrator decides how to degrade.
    pub async fn extract_skills(&self, text: &str) -> Result<SkillSet, NlpError> {
        let analysis = self.recognizer.analyze(text).await?;
        Ok(to_skill_set(
            lexicon_candidates(&self.lexicon, text)
                .into_iter()
                .chain(recognizer_candidates(&analysis)),
        ))
    }
}
