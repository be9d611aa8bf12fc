pub mod materials_handler;

pub use materials_handler::{__path_get_file_materials, get_file_materials};
