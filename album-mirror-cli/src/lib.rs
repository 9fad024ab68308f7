use std::fmt::Display;
use std::path::Path;
use std::process::{ExitCode, Termination};

use album_mirror_api_structs::AlbumId;
use structopt::StructOpt;
use url::Url;

pub mod archive;
mod error;
pub mod flickr;

pub use error::Error;

#[derive(Debug)]
pub enum Exit<T> {
    Ok,
    Err(T),
}

impl<T: Into<u8>> Exit<T> {
    pub fn code(self) -> u8 {
        match self {
            Exit::Ok => 0,
            Exit::Err(err) => err.into(),
        }
    }
}

impl<T: Into<u8> + Display> Termination for Exit<T> {
    fn report(self) -> ExitCode {
        if let Exit::Err(err) = &self {
            eprintln!("Error: {}", err);
        }
        ExitCode::from(self.code())
    }
}

impl<T> From<Result<(), T>> for Exit<T> {
    fn from(res: Result<(), T>) -> Self {
        match res {
            Ok(()) => Exit::Ok,
            Err(err) => Exit::Err(err),
        }
    }
}

#[derive(Debug, StructOpt)]
pub struct ApiArgs {
    /// Flickr REST API endpoint.
    #[structopt(
        long,
        default_value = "https://api.flickr.com/services/rest/",
        env = "ALBUM_MIRROR_API_ENDPOINT"
    )]
    pub api_endpoint: Url,

    /// Flickr API key.
    #[structopt(long, env = "FLICKR_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl ApiArgs {
    pub fn client(&self) -> Result<flickr::FlickrClient, Error> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::MissingCredential)?;

        Ok(flickr::FlickrClient::new(
            self.api_endpoint.clone(),
            api_key.clone(),
        ))
    }
}

/// Archives one album with the configured Flickr client.
///
/// Only a missing credential or a failed listing is an error; photos that
/// could not be archived are logged and still exit successfully.
pub async fn fetch(api_arguments: &ApiArgs, albums_dir: &Path, album_id: &AlbumId) -> Exit<Error> {
    match api_arguments.client() {
        Ok(client) => archive::fetch_album(&client, albums_dir, album_id).await,
        Err(err) => Exit::Err(err),
    }
}
