use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::models::{ErrorResponse, RecipeFeedback};
use crate::services::RecipeAnalyzer;

/// Recipe photos arrive as raw PNG uploads, so the default 2 MB body cap is
/// too tight.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub analyzer: Arc<dyn RecipeAnalyzer>,
}

pub fn create_router(analyzer: Arc<dyn RecipeAnalyzer>) -> Router {
    let state = Arc::new(AppState { analyzer });

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/analyze-recipe", post(analyze_recipe))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Evaluate an uploaded recipe image for a pregnant user.
///
/// Expects a `multipart/form-data` body with a file field named `file`.
/// Parts named `file` without a filename are form values, not uploads, and
/// are skipped.
async fn analyze_recipe(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<RecipeFeedback>, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                log::warn!("⚠️ Upload rejected: no 'file' field in form");
                return Err(bad_request("No file part"));
            }
            Err(e) => {
                log::warn!("⚠️ Upload rejected: malformed multipart body: {}", e);
                return Err(bad_request("No file part"));
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let filename = match field.file_name() {
            Some(filename) => filename.to_string(),
            None => continue,
        };

        if filename.is_empty() {
            log::warn!("⚠️ Upload rejected: empty filename");
            return Err(bad_request("No selected file"));
        }

        let image = field.bytes().await.map_err(|e| {
            log::warn!("⚠️ Failed to read uploaded file '{}': {}", filename, e);
            bad_request("No file part")
        })?;

        log::info!("📸 Received recipe image '{}' ({} bytes)", filename, image.len());

        let feedback = state
            .analyzer
            .analyze_recipe_image(&image)
            .await
            .map_err(|e| {
                log::error!("❌ Recipe analysis failed: {:#}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse::new(format!("Recipe analysis failed: {}", e))),
                )
            })?;

        return Ok(Json(feedback));
    }
}

async fn root_handler() -> &'static str {
    "Prenatal Recipe Analysis API - POST an image to /analyze-recipe (form field 'file')"
}

async fn health_check() -> &'static str {
    "OK"
}
