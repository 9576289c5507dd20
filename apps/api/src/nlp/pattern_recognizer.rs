//! Local heuristic recognizer. Approximates NER with capitalisation runs and
//! noun chunks with stop-word segmentation; no model download required.
//!
//! Resume and job-ad prose is mostly verb-led ("Designed scalable services").
//! Leading action verbs are stripped from every chunk and run so they never
//! reach the skill set. The `bert` feature swaps in a part-of-speech tagger.

use async_trait::async_trait;

use crate::nlp::{Analysis, Entity, EntityLabel, NlpError, PhraseRecognizer};

/// Capitalised runs longer than this are treated as headings, not names.
const MAX_ENTITY_TOKENS: usize = 4;

const CORPORATE_SUFFIXES: &[&str] = &[
    "inc",
    "corp",
    "corporation",
    "llc",
    "ltd",
    "gmbh",
    "labs",
    "technologies",
    "systems",
    "group",
    "company",
    "co",
    "university",
];

const KNOWN_PLACES: &[&str] = &[
    "london",
    "new york",
    "san francisco",
    "seattle",
    "berlin",
    "bangalore",
    "toronto",
    "remote",
    "usa",
    "united states",
    "uk",
    "europe",
    "india",
    "canada",
    "germany",
];

/// Words that break a noun chunk. Function words plus the verbs and
/// adjectives that dominate job-ad boilerplate.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "of", "in", "on", "at", "to", "for", "with",
    "by", "from", "as", "into", "about", "over", "under", "via", "per", "than", "i", "we", "you",
    "he", "she", "they", "it", "me", "us", "our", "your", "my", "their", "its", "this", "that",
    "these", "those", "who", "which", "what", "is", "are", "was", "were", "be", "been", "being",
    "am", "have", "has", "had", "do", "does", "did", "will", "would", "should", "can", "could",
    "must", "may", "might", "need", "needs", "needed", "looking", "seeking", "require",
    "required", "requires", "preferred", "plus", "work", "working", "worked", "using", "use",
    "used", "build", "building", "built", "join", "including", "strong", "excellent", "good",
    "great", "also", "very", "well", "etc", "not", "no", "yes", "all", "any", "some", "such",
    "other", "more", "most", "least",
];

/// Action verbs as they open resume bullets and job-ad duties. Only the
/// forms listed here count; gerunds are left alone since "testing" or
/// "machine learning" are skills. Forms that double as common skill nouns
/// ("design", "test", "support") appear only in their past tense.
const ACTION_VERBS: &[&str] = &[
    "develop", "develops", "developed", "maintain", "maintains", "maintained", "write",
    "writes", "wrote", "written", "create", "creates", "created", "implement", "implements",
    "implemented", "manage", "manages", "managed", "lead", "leads", "led", "deliver",
    "delivers", "delivered", "deploy", "deploys", "deployed", "drive", "drives", "drove",
    "own", "owns", "owned", "collaborate", "collaborates", "collaborated", "ensure", "ensures",
    "ensured", "improve", "improves", "improved", "optimize", "optimizes", "optimized",
    "architect", "architected", "migrate", "migrates", "migrated", "automate", "automates",
    "automated", "mentor", "mentored", "coordinate", "coordinated", "analyze", "analyzes",
    "analyzed", "integrate", "integrates", "integrated", "ship", "ships", "shipped", "launch",
    "launched", "define", "defines", "defined", "establish", "established", "contribute",
    "contributes", "contributed", "participate", "participated", "partner", "partnered",
    "communicate", "communicates", "troubleshoot", "troubleshooted", "refactor", "refactored",
    "provide", "provides", "provided", "help", "helps", "helped", "reduce", "reduced",
    "increase", "increased", "enable", "enables", "enabled", "spearhead", "spearheaded",
    "oversee", "oversaw", "streamline", "streamlined", "facilitate", "facilitated",
    "investigate", "investigated", "propose", "proposed", "publish", "published", "designed",
    "tested", "supported", "planned", "reviewed", "researched", "monitored", "documented",
    "scaled", "trained", "engineered", "ran", "assisted",
];

/// One whitespace-separated token with surrounding punctuation removed.
struct Token<'a> {
    core: &'a str,
    /// Followed by `,` `;` `:` `.` `!` `?` or a closing bracket.
    ends_clause: bool,
    ends_sentence: bool,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.split_whitespace()
        .filter_map(|raw| {
            let leading = raw.trim_start_matches(['(', '[', '{', '"', '\'', '*', '-', '•']);
            let core = leading.trim_end_matches([
                ',', ';', ':', '.', '!', '?', ')', ']', '}', '"', '\'',
            ]);
            let trailing = &leading[core.len()..];
            if core.is_empty() {
                return None;
            }
            Some(Token {
                core,
                ends_clause: !trailing.is_empty(),
                ends_sentence: trailing.contains(['.', '!', '?']),
            })
        })
        .collect()
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word.to_lowercase().as_str())
}

fn is_action_verb(word: &str) -> bool {
    ACTION_VERBS.contains(&word.to_lowercase().as_str())
}

/// Drops the verbs opening a chunk, so "maintain APIs" yields "APIs".
fn strip_leading_verbs<'a, 'b>(words: &'b [&'a str]) -> &'b [&'a str] {
    let start = words
        .iter()
        .position(|w| !is_action_verb(w))
        .unwrap_or(words.len());
    &words[start..]
}

fn label_for(run: &str) -> EntityLabel {
    let lowered = run.to_lowercase();
    let last = lowered.rsplit(' ').next().unwrap_or_default();
    if CORPORATE_SUFFIXES.contains(&last.trim_end_matches('.')) {
        EntityLabel::Organization
    } else if KNOWN_PLACES.contains(&lowered.as_str()) {
        EntityLabel::Location
    } else {
        EntityLabel::Product
    }
}

/// Runs of capitalised tokens. A single capitalised word opening a sentence
/// is ordinary prose and is skipped; stop words never start a run.
fn find_entities(tokens: &[Token<'_>]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    let mut run_starts_sentence = false;
    let mut at_sentence_start = true;

    let mut flush = |run: &mut Vec<&str>, starts_sentence: bool| {
        let stripped = strip_leading_verbs(run);
        let skip = stripped.is_empty()
            || run.len() > MAX_ENTITY_TOKENS
            || (run.len() == 1 && starts_sentence);
        if !skip {
            let text = stripped.join(" ");
            entities.push(Entity {
                label: label_for(&text),
                text,
            });
        }
        run.clear();
    };

    for token in tokens {
        let extends = is_capitalized(token.core) && (!run.is_empty() || !is_stop_word(token.core));
        if extends {
            if run.is_empty() {
                run_starts_sentence = at_sentence_start;
            }
            run.push(token.core);
        } else {
            flush(&mut run, run_starts_sentence);
        }
        if token.ends_clause {
            flush(&mut run, run_starts_sentence);
        }
        at_sentence_start = token.ends_sentence;
    }
    flush(&mut run, run_starts_sentence);

    entities
}

/// Maximal stop-word-free spans within a clause. Purely numeric spans are
/// dropped; long spans are kept so callers can apply their own word limit.
fn find_phrases(tokens: &[Token<'_>]) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut chunk: Vec<&str> = Vec::new();

    let mut flush = |chunk: &mut Vec<&str>| {
        let words = strip_leading_verbs(chunk);
        let numeric = words
            .iter()
            .all(|w| w.chars().all(|c| c.is_ascii_digit() || c == '+'));
        if !words.is_empty() && !numeric {
            phrases.push(words.join(" "));
        }
        chunk.clear();
    };

    for token in tokens {
        if is_stop_word(token.core) {
            flush(&mut chunk);
        } else {
            chunk.push(token.core);
        }
        if token.ends_clause {
            flush(&mut chunk);
        }
    }
    flush(&mut chunk);

    phrases
}

#[derive(Debug, Default)]
pub struct PatternRecognizer;

#[async_trait]
impl PhraseRecognizer for PatternRecognizer {
    fn name(&self) -> &str {
        "pattern"
    }

    async fn analyze(&self, text: &str) -> Result<Analysis, NlpError> {
        let tokens = tokenize(text);
        Ok(Analysis {
            entities: find_entities(&tokens),
            phrases: find_phrases(&tokens),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(text: &str) -> Vec<Entity> {
        find_entities(&tokenize(text))
    }

    fn phrases(text: &str) -> Vec<String> {
        find_phrases(&tokenize(text))
    }

    #[test]
    fn test_tokenize_strips_punctuation_but_keeps_symbols() {
        let tokens = tokenize("(C++), C#; Node.js.");
        let cores: Vec<&str> = tokens.iter().map(|t| t.core).collect();
        assert_eq!(cores, vec!["C++", "C#", "Node.js"]);
        assert!(tokens.iter().all(|t| t.ends_clause));
        assert!(tokens[2].ends_sentence);
        assert!(!tokens[0].ends_sentence);
    }

    #[test]
    fn test_capitalized_run_is_product_entity() {
        let found = entities("We deploy on Google Cloud daily");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Google Cloud");
        assert_eq!(found[0].label, EntityLabel::Product);
    }

    #[test]
    fn test_corporate_suffix_is_organization() {
        let found = entities("Worked at Acme Labs for years");
        assert_eq!(found[0].text, "Acme Labs");
        assert_eq!(found[0].label, EntityLabel::Organization);
    }

    #[test]
    fn test_known_place_is_location() {
        let found = entities("Based in San Francisco, hybrid");
        assert_eq!(found[0].text, "San Francisco");
        assert_eq!(found[0].label, EntityLabel::Location);
    }

    #[test]
    fn test_single_word_at_sentence_start_is_ignored() {
        let found = entities("Looking for engineers. Experience with Kubernetes");
        let texts: Vec<&str> = found.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Kubernetes"]);
    }

    #[test]
    fn test_long_title_case_run_is_ignored() {
        assert!(entities("see Senior Staff Principal Platform Software Engineer role").is_empty());
    }

    #[test]
    fn test_phrases_split_at_stop_words_and_punctuation() {
        assert_eq!(
            phrases("looking for python developer with 3+ years experience"),
            vec!["python developer", "3+ years experience"]
        );
        assert_eq!(
            phrases("need react and aws, 2 years required"),
            vec!["react", "aws", "2 years"]
        );
    }

    #[test]
    fn test_numeric_only_chunks_are_dropped() {
        assert!(phrases("2021 - 2024").is_empty());
        assert!(phrases("5+ 10").is_empty());
    }

    #[test]
    fn test_leading_action_verbs_are_stripped() {
        assert_eq!(
            phrases("Develop and maintain APIs. Designed scalable microservices in Rust."),
            vec!["APIs", "scalable microservices", "Rust"]
        );
        assert_eq!(
            phrases("Develop and maintain Python services, write clean code"),
            vec!["Python services", "clean code"]
        );
    }

    #[test]
    fn test_gerunds_and_skill_nouns_are_kept() {
        assert_eq!(
            phrases("machine learning, testing, design patterns"),
            vec!["machine learning", "testing", "design patterns"]
        );
    }

    #[test]
    fn test_verb_opening_a_capitalized_run_is_dropped() {
        let found = entities("We Architected Kafka pipelines");
        let texts: Vec<&str> = found.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Kafka"]);
    }

    #[tokio::test]
    async fn test_analyze_is_deterministic() {
        let recognizer = PatternRecognizer;
        let text = "Senior engineer at Stripe Inc. Built services in Rust and Go.";
        let first = recognizer.analyze(text).await.unwrap();
        let second = recognizer.analyze(text).await.unwrap();
        assert_eq!(first, second);
        assert!(first.entities.iter().any(|e| e.text == "Stripe Inc"));
    }
}
