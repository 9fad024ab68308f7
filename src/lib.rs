use std::sync::Arc;

use structopt::StructOpt;
use tide::http::StatusCode;
use tide::utils::After;
use tide::Response;

pub mod library;
pub mod models;
pub mod telemetry;
pub mod web;

#[derive(Clone, Debug)]
pub struct State {
    pub args: Arc<Args>,
    pub library: library::Library,
    pub tera: Arc<tera::Tera>,
}

impl State {
    pub fn new(args: Args) -> Result<Self, Error> {
        let tera = web::html::utils::templates().map_err(Error::TemplateParseError)?;

        Ok(State {
            library: library::Library::new(&args.albums_dir),
            args: Arc::new(args),
            tera: Arc::new(tera),
        })
    }
}

#[derive(Debug)]
pub enum Error {
    TemplateParseError(tera::Error),
    TelemetryInitError(anyhow::Error),
    ListenError(std::io::Error),
}

impl From<Error> for u8 {
    fn from(error: Error) -> u8 {
        match error {
            Error::TemplateParseError(_) => 3,
            Error::TelemetryInitError(_) => 4,
            Error::ListenError(_) => 5,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TemplateParseError(err) => {
                write!(f, "Template parsing error: {}", err)
            },
            Error::TelemetryInitError(err) => {
                write!(f, "Failed to init telemetry: {}", err)
            },
            Error::ListenError(err) => {
                write!(f, "Failed to serve albums: {}", err)
            },
        }
    }
}

#[derive(Debug, StructOpt)]
pub struct Args {
    /// Host address to bind to.
    #[structopt(long, default_value = "localhost", env = "ALBUM_MIRROR_BIND_ADDRESS")]
    address: String,
    /// Port to bind to.
    #[structopt(long, default_value = "8000", env = "ALBUM_MIRROR_BIND_PORT")]
    port: u16,

    /// Directory the archiver wrote albums into.
    #[structopt(
        long,
        parse(from_os_str),
        default_value = "./albums",
        env = "ALBUM_MIRROR_ALBUMS_DIR"
    )]
    albums_dir: std::path::PathBuf,

    /// Base URL owner profile links point at.
    #[structopt(
        long,
        default_value = "https://www.flickr.com",
        env = "ALBUM_MIRROR_FLICKR_BASE_URL"
    )]
    flickr_base_url: url::Url,
}

/// The gallery routes on top of `state`.
pub fn app(state: State) -> tide::Server<State> {
    let mut app = tide::with_state(state);

    app.with(After(|mut res: Response| async move {
        if res.status() == StatusCode::NotFound && res.is_empty() != Some(false) {
            res.set_body("Page not found");
        }
        Ok(res)
    }));

    web::mount(&mut app);
    app
}

pub async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    let args = Args::from_args();

    telemetry::init().map_err(Error::TelemetryInitError)?;

    let state = State::new(args)?;
    let args = state.args.clone();

    tracing::info!(
        albums_dir = %args.albums_dir.display(),
        "Serving albums at http://{}:{}",
        args.address,
        args.port
    );

    let address: &str = args.address.as_ref();
    app(state)
        .listen((address, args.port))
        .await
        .map_err(Error::ListenError)?;

    Ok(())
}
