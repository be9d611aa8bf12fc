mod material_generator;
mod pipeline_service;

pub use material_generator::MaterialGenerator;
pub use pipeline_service::{PipelineService, PipelineSettings};
