mod essay_feedback;

pub use essay_feedback::{EssayFeedback, GradeEstimate};
