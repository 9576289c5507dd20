// Resume ↔ job matching engine.
// Pipeline: skill + experience extraction → semantic similarity → gap analysis → score fusion → advice.
// Model calls go through the `nlp` traits; everything else here is pure.

pub mod advice;
pub mod experience;
pub mod extract;
pub mod fusion;
pub mod gap;
pub mod handlers;
pub mod lexicon;
pub mod orchestrator;
pub mod similarity;
pub mod skills;
