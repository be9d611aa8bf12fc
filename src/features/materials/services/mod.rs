mod materials_service;

pub use materials_service::MaterialsService;
