use tide::http::{mime, StatusCode};
use tide::Response;

mod files;
pub mod html;

pub(super) fn mount(app: &mut tide::Server<crate::State>) {
    html::mount(app);
    files::mount(app);
}

pub(crate) fn not_found(message: &'static str) -> Response {
    Response::builder(StatusCode::NotFound)
        .content_type(mime::PLAIN)
        .body(message)
        .build()
}
