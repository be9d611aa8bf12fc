mod quota_service;

pub use quota_service::QuotaService;
