pub mod process_file_handler;

pub use process_file_handler::{__path_process_file, process_file};
