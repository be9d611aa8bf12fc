mod process_file_dto;

pub use process_file_dto::{ProcessFileDto, ProcessFileResponseDto};
