use album_mirror_api_structs::{AlbumId, PhotoDetail, PhotoSummary, SizeUrls};
use serde::Deserialize;
use url::Url;

use crate::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.flickr.com/services/rest/";

/// The remote calls the archiver needs.
#[async_trait::async_trait]
pub trait PhotoApi: Send + Sync {
    /// Every photo of an album, in album order, with `index` filled in.
    async fn list_album_photos(&self, album_id: &AlbumId) -> Result<Vec<PhotoSummary>, Error>;

    async fn fetch_photo_detail(&self, photo_id: &str) -> Result<PhotoDetail, Error>;

    /// Starts a download and hands back the still-unread body.
    async fn open_download(&self, url: &str) -> Result<surf::Body, Error>;
}

#[derive(Debug, Deserialize)]
#[serde(tag = "stat", rename_all = "lowercase")]
enum Envelope<T> {
    Ok(T),
    Fail {
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Other,
}

impl<T> Envelope<T> {
    /// Any `stat` but `ok` is a remote failure.
    fn into_result(self) -> Result<T, String> {
        match self {
            Envelope::Ok(body) => Ok(body),
            Envelope::Fail { message } => Err(message),
            Envelope::Other => Err("unexpected response status".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PhotosetPhotos {
    photoset: Photoset,
}

#[derive(Debug, Deserialize)]
struct Photoset {
    #[serde(default)]
    photo: Vec<PhotoSummary>,
}

#[derive(Debug, Deserialize)]
struct PhotoInfo {
    photo: PhotoDetail,
}

/// Numbers the photos in the order the API returned them.
pub fn assign_indices(mut photos: Vec<PhotoSummary>) -> Vec<PhotoSummary> {
    for (index, photo) in photos.iter_mut().enumerate() {
        photo.index = index;
    }
    photos
}

pub fn parse_album_listing(body: &[u8]) -> Result<Vec<PhotoSummary>, Error> {
    let listing = serde_json::from_slice::<Envelope<PhotosetPhotos>>(body)?
        .into_result()
        .map_err(Error::RemoteApi)?;
    Ok(assign_indices(listing.photoset.photo))
}

pub fn parse_photo_info(photo_id: &str, body: &[u8]) -> Result<PhotoDetail, Error> {
    let info = serde_json::from_slice::<Envelope<PhotoInfo>>(body)?
        .into_result()
        .map_err(|message| Error::RemoteApi(format!("{} for photo ID {}", message, photo_id)))?;
    Ok(info.photo)
}

pub struct FlickrClient {
    http: surf::Client,
    endpoint: Url,
    api_key: String,
}

impl FlickrClient {
    pub fn new(endpoint: Url, api_key: String) -> Self {
        FlickrClient {
            http: surf::Client::new(),
            endpoint,
            api_key,
        }
    }

    fn method_url(&self, method: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("method", method)
            .append_pair("api_key", &self.api_key)
            .extend_pairs(params)
            .append_pair("format", "json")
            .append_pair("nojsoncallback", "1");
        url
    }

    async fn get(&self, url: &str) -> Result<surf::Response, Error> {
        let res = self.http.get(url).await?;
        if !res.status().is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: res.status(),
            });
        }
        Ok(res)
    }

    async fn call(&self, method: &str, params: &[(&str, &str)]) -> Result<Vec<u8>, Error> {
        log::debug!("Calling {} with {:?}", method, params);
        let url = self.method_url(method, params);
        let mut res = self.get(url.as_str()).await.map_err(|err| match err {
            // Keep the API key out of error messages.
            Error::HttpStatus { status, .. } => Error::HttpStatus {
                url: method.to_string(),
                status,
            },
            err => err,
        })?;
        Ok(res.body_bytes().await?)
    }
}

#[async_trait::async_trait]
impl PhotoApi for FlickrClient {
    async fn list_album_photos(&self, album_id: &AlbumId) -> Result<Vec<PhotoSummary>, Error> {
        let body = self
            .call(
                "flickr.photosets.getPhotos",
                &[("photoset_id", album_id.as_str()), ("extras", SizeUrls::EXTRAS)],
            )
            .await?;
        parse_album_listing(&body)
    }

    async fn fetch_photo_detail(&self, photo_id: &str) -> Result<PhotoDetail, Error> {
        let body = self
            .call("flickr.photos.getInfo", &[("photo_id", photo_id)])
            .await?;
        parse_photo_info(photo_id, &body)
    }

    async fn open_download(&self, url: &str) -> Result<surf::Body, Error> {
        let mut res = self.get(url).await?;
        Ok(res.take_body())
    }
}
