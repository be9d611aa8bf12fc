mod materials_dto;

pub use materials_dto::{EssayPromptDto, FlashcardDto, MaterialsResponseDto, McqQuestionDto};
