mod scorer;
mod study_session;

pub use scorer::{finalize_session, AnsweredItem, SessionScore};
pub use study_session::{NewStudyProgress, NewStudySession, SessionType, StudySession};
