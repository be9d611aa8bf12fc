mod essay_service;

pub use essay_service::EssayService;
