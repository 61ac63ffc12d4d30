//! `/api/projects` routes: listing with description pickup, create,
//! delete, media refresh and local-file upload.

use std::{
    fs,
    path::{Path, PathBuf},
};

use {
    axum::{
        Json, Router,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    serde::Deserialize,
    serde_json::json,
    tracing::warn,
};

use {
    atelier_git::GitProvider,
    atelier_projects::{
        ConnectionType, MEDIA_SUBFOLDERS, MediaItem, MediaKind, ProjectRecord, descfile,
        scan_media,
    },
};

use crate::{
    auth::now_ms,
    auth_middleware::CurrentUser,
    server::{api_error, store_error},
    state::AppState,
};

/// Build the projects router with all `/api/projects/*` routes.
pub fn project_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_handler).post(create_handler).delete(delete_handler),
        )
        .route("/refresh", post(refresh_handler))
        .route("/upload", post(upload_handler))
}

// ── List ─────────────────────────────────────────────────────────────────────

async fn list_handler(user: CurrentUser, State(state): State<AppState>) -> Response {
    let mut projects = match state.store.projects_by_user(&user.id).await {
        Ok(projects) => projects,
        Err(e) => return store_error(e),
    };

    // Pick up desc.txt edits made outside the app. Unreadable storage
    // (offline share, permissions) keeps the stored description.
    for project in &mut projects {
        if project.storage_location.is_empty() {
            continue;
        }
        let Some(parsed) = descfile::load(Path::new(&project.storage_location)) else {
            continue;
        };
        if let Some(main) = parsed.main.filter(|m| !m.is_empty())
            && main != project.description
        {
            project.description = main;
            if let Err(e) = state.store.upsert_project(project.clone()).await {
                warn!(error = %e, id = %project.id, "failed to persist picked-up description");
            }
        }
    }

    Json(json!({ "projects": projects })).into_response()
}

// ── Create ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectBody {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    thumbnail: Option<String>,
    media: Option<Vec<MediaItem>>,
    storage_location: Option<String>,
    connection_type: Option<ConnectionType>,
    connection_path: Option<String>,
    connection_provider: Option<GitProvider>,
    organization: Option<String>,
}

async fn create_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateProjectBody>,
) -> Response {
    let id = body
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| now_ms().to_string());
    let mut record = ProjectRecord {
        id,
        user_id: user.id,
        name: body
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        description: body.description.unwrap_or_default(),
        thumbnail: body.thumbnail,
        media: body.media.unwrap_or_default(),
        storage_location: body.storage_location.unwrap_or_default(),
        connection_type: body.connection_type,
        connection_path: body.connection_path,
        connection_provider: body.connection_provider,
        organization: body.organization,
    };

    if !record.storage_location.is_empty() {
        let root = Path::new(&record.storage_location);
        if let Some(main) = descfile::load(root)
            .and_then(|parsed| parsed.main)
            .filter(|m| !m.is_empty())
        {
            record.description = main;
        }
        // Standard subfolders; creation failures are not fatal.
        for &(subfolder, _) in MEDIA_SUBFOLDERS {
            let _ = fs::create_dir_all(root.join(subfolder));
        }
    }

    if let Err(e) = state.store.upsert_project(record.clone()).await {
        return store_error(e);
    }
    Json(json!({ "project": record })).into_response()
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DeleteBody {
    ids: Option<Vec<String>>,
}

async fn delete_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<DeleteBody>,
) -> Response {
    let Some(ids) = body.ids else {
        return api_error(StatusCode::BAD_REQUEST, "ids[] required");
    };
    match state.store.delete_projects(&user.id, &ids).await {
        Ok(removed) => Json(json!({ "removed": removed })).into_response(),
        Err(e) => store_error(e),
    }
}

// ── Refresh ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RefreshBody {
    id: Option<String>,
}

async fn refresh_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<RefreshBody>,
) -> Response {
    let Some(id) = body.id.filter(|id| !id.is_empty()) else {
        return api_error(StatusCode::BAD_REQUEST, "Missing id");
    };
    let mut project = match state.store.project(&user.id, &id).await {
        Ok(Some(project)) => project,
        Ok(None) => return api_error(StatusCode::NOT_FOUND, "Not found"),
        Err(e) => return store_error(e),
    };
    if project.storage_location.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "No storage location");
    }

    let root = Path::new(&project.storage_location);
    let desc = descfile::load(root).unwrap_or_default();
    project.media = scan_media(root, &desc);
    if let Some(main) = desc.main.filter(|m| !m.is_empty()) {
        project.description = main;
    }

    if let Err(e) = state.store.upsert_project(project.clone()).await {
        return store_error(e);
    }
    Json(json!({ "project": project })).into_response()
}

// ── Upload ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct UploadBody {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<MediaKind>,
    sources: Option<Vec<String>>,
}

async fn upload_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<UploadBody>,
) -> Response {
    let id = body.id.unwrap_or_default();
    let sources = body.sources.unwrap_or_default();
    let kind = match body.kind {
        Some(kind) if !id.is_empty() && !sources.is_empty() => kind,
        _ => {
            return api_error(StatusCode::BAD_REQUEST, "id, type, and sources[] required");
        },
    };

    let mut project = match state.store.project(&user.id, &id).await {
        Ok(Some(project)) => project,
        Ok(None) => return api_error(StatusCode::NOT_FOUND, "Not found"),
        Err(e) => return store_error(e),
    };
    if project.storage_location.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "No storage location");
    }

    let dest = Path::new(&project.storage_location).join(kind.subfolder());
    let _ = fs::create_dir_all(&dest);

    let mut saved = Vec::new();
    for source in &sources {
        let file_name = Path::new(source)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let safe_name = sanitize_file_name(&file_name);
        let target = unique_target(&dest, &safe_name);
        if let Err(e) = fs::copy(source, &target) {
            // Unreadable sources are skipped, the rest still land.
            warn!(error = %e, source = %source, "upload source could not be copied");
            continue;
        }
        saved.push(MediaItem {
            uri: target.to_string_lossy().into_owned(),
            description: safe_name,
            kind,
        });
    }

    let saved_count = saved.len();
    project.media.extend(saved);
    if let Err(e) = state.store.upsert_project(project.clone()).await {
        return store_error(e);
    }
    Json(json!({ "project": project, "saved": saved_count })).into_response()
}

/// Make a file name safe to create: path separators and control
/// characters are dropped, reserved punctuation becomes `_`, and an empty
/// result falls back to `file`.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '\\' | '/') && !c.is_control())
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// First free path for `file_name` under `dir`, appending ` (N)` before
/// the extension until the name is unused.
fn unique_target(dir: &Path, file_name: &str) -> PathBuf {
    let first = dir.join(file_name);
    if !first.exists() {
        return first;
    }
    let base = Path::new(file_name);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = base
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (1..)
        .map(|i| dir.join(format!("{stem} ({i}){ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}
