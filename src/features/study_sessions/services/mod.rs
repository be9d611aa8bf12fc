mod study_session_service;

pub use study_session_service::StudySessionService;
