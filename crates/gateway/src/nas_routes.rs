//! `/api/nas` routes: probing a share directory for a description file.

use std::{fs, path::Path};

use {
    axum::{
        Json, Router,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::post,
    },
    serde::Deserialize,
    serde_json::json,
};

use crate::{auth_middleware::CurrentUser, server::api_error, state::AppState};

/// Build the NAS router.
pub fn nas_router() -> Router<AppState> {
    Router::new().route("/probe", post(probe_handler))
}

#[derive(Deserialize)]
struct ProbeBody {
    path: Option<String>,
}

/// Look for a description file directly inside the given directory.
async fn probe_handler(_user: CurrentUser, Json(body): Json<ProbeBody>) -> Response {
    let Some(path) = body.path.filter(|p| !p.is_empty()) else {
        return api_error(StatusCode::BAD_REQUEST, "Missing path");
    };

    match find_description_file(Path::new(&path)) {
        Some((file, content)) => {
            Json(json!({ "file": file, "content": content })).into_response()
        },
        None => api_error(StatusCode::NOT_FOUND, "No description file found"),
    }
}

/// Pick the best description candidate: any file whose name contains
/// `desc` (case-insensitive), preferring `.txt` over `.md` over the rest.
/// Ties keep directory order.
fn find_description_file(dir: &Path) -> Option<(String, String)> {
    let entries = fs::read_dir(dir).ok()?;
    let mut candidates: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.to_lowercase().contains("desc"))
        .collect();
    candidates.sort_by_key(|name| {
        let lower = name.to_lowercase();
        if lower.ends_with(".txt") {
            0
        } else if lower.ends_with(".md") {
            1
        } else {
            2
        }
    });

    let file = candidates.into_iter().next()?;
    let content = fs::read_to_string(dir.join(&file)).ok()?;
    Some((file, content))
}
