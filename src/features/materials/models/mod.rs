mod artifact;
mod record;

pub use artifact::{EssayPrompt, Flashcard, GeneratedArtifactBatch, McqQuestion};
pub use record::{
    ArgumentFramework, EssayPromptRecord, FlashcardRecord, McqOptions, McqQuestionRecord,
    StoredMaterials,
};
