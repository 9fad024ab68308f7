use html_minifier::HTMLMinifier;
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;
use tide::log::error;

use crate::State;

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../../../templates/base.html")),
    ("index.html", include_str!("../../../templates/index.html")),
    ("album.html", include_str!("../../../templates/album.html")),
    ("photo.html", include_str!("../../../templates/photo.html")),
];

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("rendering error")]
    Tera(#[from] tera::Error),
}

/// Compiles the built-in templates.
pub fn templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    Ok(tera)
}

pub(super) fn render<T: Serialize>(
    state: &State,
    template: &'static str,
    view: &T,
) -> Result<String, TemplateError> {
    let context = Context::from_serialize(view)?;
    let rendered = state.tera.render(template, &context)?;

    let mut html_minifier = HTMLMinifier::new();
    if let Err(err) = html_minifier.digest(&rendered) {
        error!("Failed to minify HTML: {}", err);
        return Ok(rendered);
    };

    let minified = match std::str::from_utf8(html_minifier.get_html()) {
        Ok(minified) => minified.to_string(),
        Err(err) => {
            error!("Failed to parse minified HTML as UTF-8: {}", err);
            rendered
        },
    };

    Ok(minified)
}
