use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::essays::{
    dtos as essays_dtos, handlers as essays_handlers, models as essays_models,
};
use crate::features::files::{
    dtos as files_dtos, handlers as files_handlers, models as files_models,
};
use crate::features::generation::{dtos as generation_dtos, handlers as generation_handlers};
use crate::features::materials::{
    dtos as materials_dtos, handlers as materials_handlers, models as materials_models,
};
use crate::features::quotas::{
    dtos as quotas_dtos, handlers as quotas_handlers, models as quotas_models,
};
use crate::features::study_sessions::{
    dtos as study_sessions_dtos, handlers as study_sessions_handlers,
    models as study_sessions_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Files
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::get_file,
        files_handlers::delete_file,
        // Generation
        generation_handlers::process_file,
        // Materials
        materials_handlers::get_file_materials,
        // Usage
        quotas_handlers::get_usage,
        // Study sessions
        study_sessions_handlers::create_study_session,
        // Essays
        essays_handlers::submit_essay,
        // Dashboard
        dashboard_handlers::get_dashboard,
    ),
    components(
        schemas(
            // Shared
            Meta,
            auth::model::AuthenticatedUser,
            // Files
            files_models::FileType,
            files_models::ProcessingStatus,
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            files_dtos::DeleteFileResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<Vec<files_dtos::FileResponseDto>>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
            // Generation
            generation_dtos::ProcessFileDto,
            generation_dtos::ProcessFileResponseDto,
            ApiResponse<generation_dtos::ProcessFileResponseDto>,
            // Materials
            materials_models::McqOptions,
            materials_models::ArgumentFramework,
            materials_dtos::FlashcardDto,
            materials_dtos::McqQuestionDto,
            materials_dtos::EssayPromptDto,
            materials_dtos::MaterialsResponseDto,
            ApiResponse<materials_dtos::MaterialsResponseDto>,
            // Usage
            quotas_models::Tier,
            quotas_dtos::UsageFiguresDto,
            quotas_dtos::UsageResponseDto,
            ApiResponse<quotas_dtos::UsageResponseDto>,
            // Study sessions
            study_sessions_models::SessionType,
            study_sessions_dtos::AnsweredItemDto,
            study_sessions_dtos::CreateStudySessionDto,
            study_sessions_dtos::StudySessionResponseDto,
            ApiResponse<study_sessions_dtos::StudySessionResponseDto>,
            // Essays
            essays_models::GradeEstimate,
            essays_models::EssayFeedback,
            essays_dtos::SubmitEssayDto,
            essays_dtos::EssayFeedbackResponseDto,
            ApiResponse<essays_dtos::EssayFeedbackResponseDto>,
            // Dashboard
            dashboard_dtos::DashboardStatsDto,
            dashboard_dtos::WeakTopicDto,
            dashboard_dtos::ActivityEntryDto,
            dashboard_dtos::DashboardResponseDto,
            ApiResponse<dashboard_dtos::DashboardResponseDto>,
        )
    ),
    tags(
        (name = "files", description = "Source file upload and management"),
        (name = "generation", description = "Study material generation from uploaded files"),
        (name = "materials", description = "Generated flashcards, questions and essay prompts"),
        (name = "usage", description = "Monthly quota usage"),
        (name = "study-sessions", description = "Scored flashcard and quiz sessions"),
        (name = "essays", description = "Essay feedback"),
        (name = "dashboard", description = "Study overview and streak"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Studyforge API",
        version = "0.1.0",
        description = "API documentation for Studyforge",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
