pub mod study_session_handler;

pub use study_session_handler::{__path_create_study_session, create_study_session};
