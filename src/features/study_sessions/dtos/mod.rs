mod study_session_dto;

pub use study_session_dto::{AnsweredItemDto, CreateStudySessionDto, StudySessionResponseDto};
