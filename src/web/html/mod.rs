use album_mirror_api_structs::AlbumId;
use tide::http::StatusCode;
use tide::{Request, Response};

use crate::library::albums::AlbumProvider;
use crate::models::albums::{AlbumPage, IndexPage, PhotoPage};
use crate::web::not_found;

pub mod utils;

use utils::render;

pub(in super::super) fn mount(route: &mut tide::Server<crate::State>) {
    route.at("/").get(index);
    route.at("/album/:album_id").get(album);
    route.at("/album/:album_id/photo/:photo_id").get(photo);
}

fn decoded_param(req: &Request<crate::State>, name: &str) -> tide::Result<String> {
    let value = req.param(name)?;
    Ok(percent_encoding::percent_decode_str(value)
        .decode_utf8_lossy()
        .to_string())
}

fn album_id_param(req: &Request<crate::State>) -> tide::Result<Option<AlbumId>> {
    Ok(decoded_param(req, "album_id")?.parse().ok())
}

fn html(body: String) -> Response {
    Response::builder(StatusCode::Ok)
        .content_type("text/html")
        .body(body)
        .build()
}

async fn index(req: Request<crate::State>) -> tide::Result<Response> {
    let state = req.state();

    let page = IndexPage {
        albums: state.library.get_album_ids().await?,
    };

    Ok(html(render(state, "index.html", &page)?))
}

async fn album(req: Request<crate::State>) -> tide::Result<Response> {
    let state = req.state();

    let album_id = match album_id_param(&req)? {
        Some(album_id) => album_id,
        None => return Ok(not_found("Album not found")),
    };

    let photos = match state.library.get_album_photos(&album_id).await? {
        Some(photos) => photos,
        None => return Ok(not_found("Album not found")),
    };
    tracing::debug!(album = %album_id, photos = photos.len(), "rendering album");

    let page = AlbumPage::new(album_id, photos);
    Ok(html(render(state, "album.html", &page)?))
}

async fn photo(req: Request<crate::State>) -> tide::Result<Response> {
    let state = req.state();

    let album_id = match album_id_param(&req)? {
        Some(album_id) => album_id,
        None => return Ok(not_found("Photo not found")),
    };
    let photo_id = decoded_param(&req, "photo_id")?;

    let (detail, neighbours) = match state.library.get_photo_by_id(&album_id, &photo_id).await? {
        Some(found) => found,
        None => return Ok(not_found("Photo not found")),
    };

    let page = PhotoPage::new(
        album_id,
        photo_id,
        detail,
        neighbours,
        &state.args.flickr_base_url,
    );
    Ok(html(render(state, "photo.html", &page)?))
}
