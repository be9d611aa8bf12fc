pub mod essay_handler;

pub use essay_handler::{__path_submit_essay, submit_essay};
