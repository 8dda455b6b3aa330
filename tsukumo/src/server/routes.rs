//! Request handlers for the repository service.

use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::error::{ApiError, INVALID_FORMAT_MESSAGE};
use super::filename::secure_filename;
use super::AppState;
use crate::manager::checksum::{calculate_checksum, calculate_file_checksum};
use crate::manager::{
    is_plain_name, ArchiveCodec, ManagerError, ManagerResult, STAGING_PREFIX,
};
use crate::package::{allowed_file, ArchiveEntry, ArchiveFormat};

/// Filename of the archive produced by `/compile`.
pub const COMPILED_PACKAGE: &str = "compiled_package.tar.gz";

/// Multipart field carrying a single upload.
const FILE_FIELD: &str = "file";

/// Multipart field carrying compile inputs.
const FILES_FIELD: &str = "files";

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// An uploaded multipart file.
struct Upload {
    filename: String,
    data: Vec<u8>,
}

/// Run blocking store work off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> ManagerResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Collect every file in the named multipart field.
async fn read_uploads(mut multipart: Multipart, field_name: &str) -> Result<Vec<Upload>, ApiError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        uploads.push(Upload {
            filename,
            data: data.to_vec(),
        });
    }

    Ok(uploads)
}

/// Sanitized filename of an upload, if it is an allowed archive.
fn accepted_filename(upload: &Upload) -> Option<String> {
    secure_filename(&upload.filename).filter(|name| allowed_file(name))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `GET /` - minimal HTML listing of stored packages.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let store = state.store.clone();
    let packages = blocking(move || store.list()).await?;

    let items: String = packages
        .iter()
        .map(|name| {
            let name = escape_html(name);
            format!("<li><a href=\"/packages/{0}\">{0}</a></li>\n", name)
        })
        .collect();

    Ok(Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Tsukumo Repository</title></head>\n<body>\n\
         <h1>Packages</h1>\n<ul>\n{}</ul>\n\
         <form action=\"/packages\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"file\">\n<input type=\"submit\" value=\"Upload\">\n\
         </form>\n</body>\n</html>\n",
        items
    )))
}

/// `GET /packages` - JSON array of stored names.
pub async fn list_packages(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let store = state.store.clone();
    let packages = blocking(move || store.list()).await?;
    Ok(Json(packages))
}

/// `POST /packages` - store one uploaded archive and return its checksum.
pub async fn upload_package(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Some(upload) = read_uploads(multipart, FILE_FIELD).await?.into_iter().next() else {
        warn!("No file provided in request");
        return Err(ApiError::BadRequest("No file provided".to_string()));
    };

    let Some(filename) = accepted_filename(&upload) else {
        warn!(filename = %upload.filename, "Invalid file format attempt");
        return Err(ApiError::BadRequest(INVALID_FORMAT_MESSAGE.to_string()));
    };

    let store = state.store.clone();
    let name = filename.clone();
    let checksum = blocking(move || {
        store.write_archive(&name, &upload.data)?;
        Ok(calculate_checksum(&upload.data))
    })
    .await?;

    info!(package = %filename, checksum = %checksum, "Uploaded package");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Package {} uploaded successfully", filename),
            "checksum": checksum,
        })),
    ))
}

/// `GET /packages/{name}` - download a stored archive as an attachment.
pub async fn download_package(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let store = state.store.clone();
    let target = name.clone();
    let read = blocking(move || {
        let path = match store.path_of(&target) {
            Some(path) if path.is_file() => path,
            _ => return Err(ManagerError::PackageNotFound { name: target }),
        };
        let checksum = calculate_file_checksum(&path)?;
        let data = fs::read(&path).map_err(|e| ManagerError::ReadFailed { path, source: e })?;
        Ok((checksum, data))
    })
    .await;

    let (checksum, data) = match read {
        Ok(read) => read,
        Err(e) => {
            if matches!(e, ApiError::NotFound(_)) {
                warn!(package = %name, "Package not found for download");
            }
            return Err(e);
        }
    };

    info!(package = %name, checksum = %checksum, "Serving package");
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        data,
    )
        .into_response())
}

/// `DELETE /packages/{name}` - remove a stored file or directory.
pub async fn delete_package(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !is_plain_name(&name) {
        warn!(package = %name, "Package not found for deletion");
        return Err(ApiError::package_not_found());
    }

    let store = state.store.clone();
    let target = name.clone();
    match blocking(move || store.remove(&target)).await {
        Ok(()) => {
            info!(package = %name, "Package deleted");
            Ok(Json(json!({
                "message": format!("Package {} deleted successfully", name)
            })))
        }
        Err(e) => {
            if matches!(e, ApiError::NotFound(_)) {
                warn!(package = %name, "Package not found for deletion");
            }
            Err(e)
        }
    }
}

/// `POST /compile` - bundle uploaded archives into one `.tar.gz`.
pub async fn compile_package(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let uploads = read_uploads(multipart, FILES_FIELD).await?;
    if uploads.is_empty() {
        warn!("No files provided for compilation");
        return Err(ApiError::BadRequest("No files provided".to_string()));
    }

    let mut accepted = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match accepted_filename(&upload) {
            Some(filename) => accepted.push((filename, upload.data)),
            None => warn!(filename = %upload.filename, "Invalid file skipped"),
        }
    }

    let store = state.store.clone();
    let codec = state.codec;
    let staging = store.root().join(format!(
        "{}{}-{}",
        STAGING_PREFIX,
        std::process::id(),
        STAGING_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let result = blocking(move || {
        let outcome = compile_staged(&store, &codec, &staging, accepted);
        if let Err(e) = fs::remove_dir_all(&staging) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %staging.display(), error = %e, "Failed to remove staging directory");
            }
        }
        outcome
    })
    .await?;

    let Some(checksum) = result else {
        return Err(ApiError::BadRequest("No valid files provided".to_string()));
    };

    info!(package = COMPILED_PACKAGE, checksum = %checksum, "Compiled package created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Compiled package {} created successfully", COMPILED_PACKAGE),
            "checksum": checksum,
        })),
    ))
}

/// Stage accepted files, bundle them, and store the bundle.
///
/// Returns `None` when no file was accepted.
fn compile_staged<C: ArchiveCodec>(
    store: &crate::manager::LocalStore,
    codec: &C,
    staging: &std::path::Path,
    files: Vec<(String, Vec<u8>)>,
) -> ManagerResult<Option<String>> {
    fs::create_dir_all(staging).map_err(|e| ManagerError::CreateDirFailed {
        path: staging.to_path_buf(),
        source: e,
    })?;

    // Later uploads with the same name replace earlier ones
    let mut order: Vec<String> = Vec::new();
    for (filename, data) in files {
        let path = staging.join(&filename);
        fs::write(&path, data).map_err(|e| ManagerError::StoreWriteFailed { path, source: e })?;
        if !order.contains(&filename) {
            order.push(filename);
        }
    }

    if order.is_empty() {
        return Ok(None);
    }

    let mut entries = Vec::with_capacity(order.len());
    for filename in order {
        let path = staging.join(&filename);
        let data = fs::read(&path).map_err(|e| ManagerError::ReadFailed { path, source: e })?;
        entries.push(ArchiveEntry::new(filename, data));
    }

    let bundle = codec.encode(&entries, ArchiveFormat::TarGz)?;
    store.write_archive(COMPILED_PACKAGE, &bundle)?;
    Ok(Some(calculate_checksum(&bundle)))
}
