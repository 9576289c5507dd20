//! Local transformer backends on rust-bert: a CoNLL NER model plus a
//! part-of-speech tagger for the recognizer, and all-MiniLM-L6-v2 for
//! sentence embeddings. Weights are fetched on first start.
//!
//! libtorch models are not `Sync`, so each backend owns its models on a
//! dedicated thread and serves requests over a channel.

use std::sync::mpsc;
use std::thread;

use async_trait::async_trait;
use rust_bert::pipelines::ner::{Entity as NerEntity, NERModel};
use rust_bert::pipelines::pos_tagging::{POSModel, POSTag};
use rust_bert::pipelines::sentence_embeddings::{
    SentenceEmbeddingsBuilder, SentenceEmbeddingsModel, SentenceEmbeddingsModelType,
};
use rust_bert::RustBertError;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::nlp::{Analysis, Embedder, Entity, EntityLabel, NlpError, PhraseRecognizer};

pub const EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

type Reply<O> = oneshot::Sender<Result<O, NlpError>>;

/// Owns a model on its own OS thread. Calls are queued and answered in order.
struct ModelWorker<I, O> {
    jobs: mpsc::Sender<(I, Reply<O>)>,
}

impl<I, O> ModelWorker<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Loads the model on the worker thread and blocks until it is ready.
    fn spawn<M, L, R>(name: &str, load: L, run: R) -> Result<Self, NlpError>
    where
        L: FnOnce() -> Result<M, RustBertError> + Send + 'static,
        R: Fn(&M, I) -> Result<O, RustBertError> + Send + 'static,
    {
        let (jobs, queue) = mpsc::channel::<(I, Reply<O>)>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), String>>(1);

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let model = match load() {
                    Ok(model) => {
                        let _ = ready_tx.send(Ok(()));
                        model
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                for (input, reply) in queue {
                    let result = run(&model, input).map_err(|e| NlpError::Model(e.to_string()));
                    let _ = reply.send(result);
                }
            })
            .map_err(|e| NlpError::Model(format!("could not start {name}: {e}")))?;

        ready_rx
            .recv()
            .map_err(|_| NlpError::Model(format!("{name} exited while loading")))?
            .map_err(NlpError::Model)?;

        info!("{name} model loaded");
        Ok(Self { jobs })
    }

    async fn call(&self, input: I) -> Result<O, NlpError> {
        let (reply, response) = oneshot::channel();
        self.jobs
            .send((input, reply))
            .map_err(|_| NlpError::Model("model worker stopped".to_string()))?;
        response
            .await
            .map_err(|_| NlpError::Model("model worker stopped".to_string()))?
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recognizer
// ────────────────────────────────────────────────────────────────────────────

pub struct BertRecognizer {
    worker: ModelWorker<String, (Vec<NerEntity>, Vec<POSTag>)>,
}

impl BertRecognizer {
    pub fn new() -> Result<Self, NlpError> {
        let worker = ModelWorker::spawn(
            "bert-recognizer",
            || Ok((NERModel::new(Default::default())?, POSModel::new(Default::default())?)),
            |(ner, pos): &(NERModel, POSModel), text: String| {
                let entities = ner
                    .predict_full_entities(&[text.as_str()])
                    .into_iter()
                    .next()
                    .unwrap_or_default();
                let tags = pos
                    .predict(&[text.as_str()])
                    .into_iter()
                    .next()
                    .unwrap_or_default();
                Ok((entities, tags))
            },
        )?;
        Ok(Self { worker })
    }
}

#[async_trait]
impl PhraseRecognizer for BertRecognizer {
    fn name(&self) -> &str {
        "bert-ner+pos"
    }

    async fn analyze(&self, text: &str) -> Result<Analysis, NlpError> {
        let (entities, tags) = self.worker.call(text.to_string()).await?;
        debug!(entities = entities.len(), tokens = tags.len(), "Recognizer call succeeded");

        let tagged: Vec<(&str, &str)> = tags
            .iter()
            .map(|t| (t.word.as_str(), t.label.as_str()))
            .collect();

        Ok(Analysis {
            entities: entities
                .into_iter()
                .map(|e| Entity {
                    label: label_from_conll(&e.label),
                    text: e.word,
                })
                .collect(),
            phrases: noun_runs(&tagged),
        })
    }
}

/// CoNLL-03 tags (`ORG`, `I-LOC`, ...) onto the matcher's labels. MISC covers
/// products, languages and tools in that scheme.
fn label_from_conll(label: &str) -> EntityLabel {
    let bare = label
        .strip_prefix("B-")
        .or_else(|| label.strip_prefix("I-"))
        .unwrap_or(label);
    match bare {
        "ORG" => EntityLabel::Organization,
        "LOC" => EntityLabel::Location,
        "PER" => EntityLabel::Person,
        "MISC" => EntityLabel::Product,
        _ => EntityLabel::Other,
    }
}

fn is_noun(tag: &str) -> bool {
    tag.starts_with("NN")
}

fn is_adjective(tag: &str) -> bool {
    tag.starts_with("JJ")
}

/// Maximal adjective/noun runs over Penn Treebank tags, trimmed so each ends
/// on a noun. Verbs, determiners and numbers always break a run.
fn noun_runs(tagged: &[(&str, &str)]) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut run: Vec<(&str, &str)> = Vec::new();

    let mut flush = |run: &mut Vec<(&str, &str)>| {
        while run.last().is_some_and(|(_, tag)| !is_noun(tag)) {
            run.pop();
        }
        if !run.is_empty() {
            let words: Vec<&str> = run.iter().map(|(word, _)| *word).collect();
            phrases.push(words.join(" "));
        }
        run.clear();
    };

    for &(word, tag) in tagged {
        if is_noun(tag) || is_adjective(tag) {
            run.push((word, tag));
        } else {
            flush(&mut run);
        }
    }
    flush(&mut run);

    phrases
}

// ────────────────────────────────────────────────────────────────────────────
// Embedder
// ────────────────────────────────────────────────────────────────────────────

pub struct BertEmbedder {
    worker: ModelWorker<Vec<String>, Vec<Vec<f32>>>,
}

impl BertEmbedder {
    pub fn new() -> Result<Self, NlpError> {
        let worker = ModelWorker::spawn(
            "bert-embedder",
            || {
                SentenceEmbeddingsBuilder::remote(SentenceEmbeddingsModelType::AllMiniLmL6V2)
                    .create_model()
            },
            |model: &SentenceEmbeddingsModel, texts: Vec<String>| {
                model.encode(texts.as_slice())
            },
        )?;
        Ok(Self { worker })
    }
}

#[async_trait]
impl Embedder for BertEmbedder {
    fn name(&self) -> &str {
        EMBEDDING_MODEL
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, NlpError> {
        let expected = texts.len();
        let vectors = self.worker.call(texts.to_vec()).await?;
        if vectors.len() != expected {
            return Err(NlpError::EmbeddingCount {
                expected,
                got: vectors.len(),
            });
        }
        Ok(vectors)
    }
}
