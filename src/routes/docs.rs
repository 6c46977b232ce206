use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

const SWAGGER_PATH: &str = "/docs";
/// Raw OpenAPI document consumed by the Swagger UI and by client generators.
pub const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";

/// Swagger UI plus the generated OpenAPI document. Stateless, so it merges into any router.
pub fn router() -> Router<SharedState> {
    SwaggerUi::new(SWAGGER_PATH)
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .into()
}
