//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::services;
use vidshelf_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidshelf API",
        version = "0.1.0",
        description = "Video catalog service: authenticated ingestion into object storage, a public catalog listing, interaction counters and comments, and a sitemap."
    ),
    paths(
        handlers::upload::upload_video,
        handlers::upload::save_video,
        handlers::videos::list_videos,
        handlers::videos::get_video,
        handlers::interactions::record_view,
        handlers::interactions::record_like,
        handlers::interactions::record_dislike,
        handlers::interactions::add_comment,
        handlers::sitemap::sitemap,
    ),
    components(
        schemas(
            models::MediaRecord,
            services::VideoPage,
            handlers::upload::UploadResponse,
            handlers::upload::SaveVideoRequest,
            handlers::interactions::SuccessResponse,
            handlers::interactions::CommentRequest,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "ingestion", description = "Video upload and registration (admin credential required)"),
        (name = "videos", description = "Catalog listing and lookup"),
        (name = "interactions", description = "Views, likes, dislikes and comments"),
        (name = "seo", description = "Sitemap")
    )
)]
pub struct ApiDoc;
