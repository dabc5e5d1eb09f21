use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::advertisements::{
    dtos as ads_dtos, handlers as ads_handlers, models as ads_models,
};
use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::comments::{
    dtos as comments_dtos, handlers as comments_handlers, models as comments_models,
};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::posts::{dtos as posts_dtos, handlers as posts_handlers, models as posts_models};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::saved_posts::{dtos as saved_dtos, handlers as saved_handlers};
use crate::features::users::{
    dtos as users_dtos,
    handlers::{profile_handler, user_handler},
    models as users_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::request_otp,
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::google_login,
        auth::handlers::check_email,
        auth::handlers::get_me,
        // Users
        user_handler::list_users,
        user_handler::create_user,
        user_handler::update_user_role,
        user_handler::delete_user,
        profile_handler::get_profile,
        profile_handler::update_profile,
        // Categories (public)
        categories_handlers::list_categories,
        // Posts
        posts_handlers::latest_posts,
        posts_handlers::get_post,
        posts_handlers::posts_by_category,
        posts_handlers::create_post,
        posts_handlers::update_post,
        posts_handlers::list_all_posts,
        // Comments
        comments_handlers::list_post_comments,
        comments_handlers::create_comment,
        comments_handlers::list_comments,
        comments_handlers::moderate_comment,
        // Saved posts
        saved_handlers::list_saved_posts,
        saved_handlers::save_post,
        saved_handlers::unsave_post,
        saved_handlers::check_saved_post,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::resolve_report,
        // Advertisements
        ads_handlers::list_advertisements,
        ads_handlers::create_advertisement,
        ads_handlers::update_advertisement_status,
        ads_handlers::advertisement_stats,
        ads_handlers::advertisement_placement,
        ads_handlers::record_impression,
        ads_handlers::record_click,
        // Dashboard
        dashboard_handlers::get_overview,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::SessionUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::GoogleLoginRequestDto,
            auth::dtos::EmailRequestDto,
            auth::dtos::EmailExistsResponseDto,
            auth::dtos::OtpSentResponseDto,
            auth::dtos::AuthResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::model::SessionUser>,
            // Users
            users_models::UserRole,
            users_models::Gender,
            users_dtos::UserResponseDto,
            users_dtos::CreateUserDto,
            users_dtos::UpdateRoleDto,
            users_dtos::ProfileResponseDto,
            users_dtos::UpdateProfileDto,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<users_dtos::ProfileResponseDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Posts
            posts_models::PostStatus,
            posts_dtos::PostResponseDto,
            posts_dtos::PostSummaryDto,
            posts_dtos::CreatePostDto,
            posts_dtos::UpdatePostDto,
            ApiResponse<posts_dtos::PostResponseDto>,
            ApiResponse<Vec<posts_dtos::PostSummaryDto>>,
            // Comments
            comments_models::CommentStatus,
            comments_dtos::CommentResponseDto,
            comments_dtos::PublicCommentDto,
            comments_dtos::AdminCommentDto,
            comments_dtos::CreateCommentDto,
            comments_dtos::ModerateCommentDto,
            ApiResponse<comments_dtos::CommentResponseDto>,
            ApiResponse<Vec<comments_dtos::PublicCommentDto>>,
            ApiResponse<Vec<comments_dtos::AdminCommentDto>>,
            // Saved posts
            saved_dtos::SavedPostDto,
            saved_dtos::SavePostDto,
            saved_dtos::SavedStatusDto,
            ApiResponse<Vec<saved_dtos::SavedPostDto>>,
            ApiResponse<saved_dtos::SavedStatusDto>,
            // Reports
            reports_models::ReportType,
            reports_models::ReportStatus,
            reports_dtos::ReportResponseDto,
            reports_dtos::CreateReportDto,
            reports_dtos::ResolveReportDto,
            reports_dtos::ResolveReportResponseDto,
            reports_dtos::ReportDetailDto,
            reports_dtos::ReportedPostDto,
            reports_dtos::ReportedCommentDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ResolveReportResponseDto>,
            ApiResponse<reports_dtos::ReportDetailDto>,
            // Advertisements
            ads_models::AdStatus,
            ads_models::AdMetricType,
            ads_dtos::AdvertisementResponseDto,
            ads_dtos::CreateAdvertisementDto,
            ads_dtos::UpdateAdStatusDto,
            ads_dtos::RecordMetricDto,
            ads_dtos::AdStatsDto,
            ApiResponse<ads_dtos::AdvertisementResponseDto>,
            ApiResponse<Vec<ads_dtos::AdvertisementResponseDto>>,
            ApiResponse<ads_dtos::AdStatsDto>,
            // Dashboard
            dashboard_dtos::MonthlyStatDto,
            dashboard_dtos::DashboardOverviewDto,
            ApiResponse<dashboard_dtos::DashboardOverviewDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and session"),
        (name = "users", description = "Account administration and own profile"),
        (name = "categories", description = "News categories (public)"),
        (name = "posts", description = "News articles"),
        (name = "comments", description = "Reader comments and moderation"),
        (name = "saved-posts", description = "Reader bookmarks"),
        (name = "reports", description = "Content reports and their resolution"),
        (name = "advertisements", description = "Advertising campaigns and placement"),
        (name = "ad-metrics", description = "Impression and click beacons (public)"),
        (name = "Dashboard", description = "Admin overview"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Tin Tức API",
        version = "0.1.0",
        description = "API documentation for the Tin Tức news platform",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_moderation_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/reports/{id}"));
        assert!(doc.paths.paths.contains_key("/api/comments/{id}"));
        assert!(doc.paths.paths.contains_key("/api/advertisements/{id}/stats"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
