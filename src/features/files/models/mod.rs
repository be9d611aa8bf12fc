mod file;

pub use file::{File, FileType, NewFile, ProcessingStatus};
