use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tide::http::{mime, Mime, StatusCode};
use tide::{Body, Request, Response};

use crate::web::not_found;

pub(super) fn mount(route: &mut tide::Server<crate::State>) {
    route.at("/albums/*path").get(archived_file);
}

/// `path` as a relative path that cannot leave the directory it is joined to.
fn confined_path(path: &str) -> Option<PathBuf> {
    let path = Path::new(path);
    let mut components = path.components().peekable();
    components.peek()?;
    if components.all(|component| matches!(component, Component::Normal(_))) {
        Some(path.to_path_buf())
    } else {
        None
    }
}

fn mime_for(path: &Path) -> Mime {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let essence = match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("json") => "application/json",
        Some("html") | Some("htm") => "text/html",
        Some("txt") => "text/plain",
        _ => return mime::BYTE_STREAM,
    };

    essence.parse().unwrap_or(mime::BYTE_STREAM)
}

async fn archived_file(req: Request<crate::State>) -> tide::Result<Response> {
    let state = req.state();

    let requested = percent_encoding::percent_decode_str(req.param("path")?)
        .decode_utf8_lossy()
        .to_string();
    let path = match confined_path(&requested) {
        Some(relative) => state.library.root().join(relative),
        None => return Ok(not_found("File not found")),
    };

    match async_std::fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => {},
        Ok(_) => return Ok(not_found("File not found")),
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(not_found("File not found")),
        Err(err) => return Err(err.into()),
    }

    let body = Body::from_file(&path).await?;
    Ok(Response::builder(StatusCode::Ok)
        .body(body)
        .content_type(mime_for(&path))
        .build())
}
