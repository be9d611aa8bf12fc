mod essay_dto;

pub use essay_dto::{EssayFeedbackResponseDto, SubmitEssayDto};
