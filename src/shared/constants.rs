/// Number of files returned by the upload history listing
pub const RECENT_FILES_LIMIT: i64 = 10;

/// Maximum upload size in bytes (100MB)
pub const MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

/// Minimum trimmed length of an essay submitted for feedback
pub const MIN_ESSAY_LENGTH: usize = 100;

// =============================================================================
// GENERATION CONTRACT
// =============================================================================

pub const FLASHCARD_COUNT: usize = 10;
pub const MCQ_COUNT: usize = 5;
/// Every multiple-choice question carries exactly this many options
pub const MCQ_OPTION_COUNT: usize = 4;
pub const ESSAY_PROMPT_COUNT: usize = 3;

// =============================================================================
// ACTIVITY LOG
// =============================================================================

pub const ACTION_GENERATE_MATERIALS: &str = "generate_materials";
pub const ACTION_SUBMIT_ESSAY: &str = "submit_essay";
pub const ACTION_STUDY_SESSION: &str = "study_session";
