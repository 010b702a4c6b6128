use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::get_book,
        api::books::get_palette,
        api::user_books::list_user_books,
        api::users::list_users,
        api::view::initial_view,
        api::view::replay_view,
    ),
    components(
        schemas(
            crate::models::Book,
            crate::models::ReadingRecord,
            crate::models::ReadingStatus,
            crate::models::User,
            crate::models::UserBook,
            crate::services::Rgb,
            crate::services::TextColor,
            crate::services::BookGroup,
            crate::services::ViewSnapshot,
            api::books::PaletteResponse,
            api::books::PaletteSource,
            api::users::UserSummary,
            api::view::ViewRequest,
            api::view::ViewResponse,
        )
    ),
    tags(
        (name = "sixtybooks", description = "Sixty Books API")
    )
)]
pub struct ApiDoc;
