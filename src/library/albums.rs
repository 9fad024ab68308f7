use std::io::ErrorKind;
use std::path::Path;

use album_mirror_api_structs::{
    is_safe_token, photo_id_from_metadata_file, AlbumId, PhotoDetail, PhotoId, StoredPhoto,
};
use async_std::fs;
use async_std::prelude::*;
use serde::Serialize;

use super::{Error, Library};

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Neighbours {
    pub previous: Option<PhotoId>,
    pub next: Option<PhotoId>,
}

/// Photos adjacent to `photo_id` in `sorted_ids`.
pub fn neighbours(sorted_ids: &[PhotoId], photo_id: &str) -> Neighbours {
    match sorted_ids.iter().position(|id| id == photo_id) {
        Some(position) => Neighbours {
            previous: position
                .checked_sub(1)
                .map(|previous| sorted_ids[previous].clone()),
            next: sorted_ids.get(position + 1).cloned(),
        },
        None => Neighbours::default(),
    }
}

#[async_trait::async_trait]
pub trait AlbumProvider {
    /// Every album directory, sorted by id.
    async fn get_album_ids(&self) -> Result<Vec<AlbumId>, Error>;

    /// Ids of every photo with a metadata file, sorted lexicographically.
    /// `None` if the album does not exist.
    async fn get_photo_ids(&self, album_id: &AlbumId) -> Result<Option<Vec<PhotoId>>, Error>;

    async fn get_album_photos(
        &self,
        album_id: &AlbumId,
    ) -> Result<Option<Vec<(PhotoId, PhotoDetail)>>, Error>;

    async fn get_photo_by_id(
        &self,
        album_id: &AlbumId,
        photo_id: &str,
    ) -> Result<Option<(PhotoDetail, Neighbours)>, Error>;
}

async fn is_dir(path: &Path) -> Result<bool, Error> {
    match fs::metadata(path).await {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

async fn read_metadata(path: &Path) -> Result<Option<PhotoDetail>, Error> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
}

#[async_trait::async_trait]
impl AlbumProvider for Library {
    async fn get_album_ids(&self) -> Result<Vec<AlbumId>, Error> {
        if !is_dir(self.root()).await? {
            tracing::warn!(root = %self.root().display(), "album root does not exist");
            return Ok(Vec::new());
        }

        let mut album_ids = Vec::new();
        let mut entries = fs::read_dir(self.root()).await?;
        while let Some(entry) = entries.next().await {
            let entry = entry?;
            if !entry.file_type().await?.is_dir() {
                continue;
            }

            match entry.file_name().to_string_lossy().parse::<AlbumId>() {
                Ok(album_id) => album_ids.push(album_id),
                Err(err) => tracing::debug!("skipping directory: {}", err),
            }
        }

        album_ids.sort();
        Ok(album_ids)
    }

    async fn get_photo_ids(&self, album_id: &AlbumId) -> Result<Option<Vec<PhotoId>>, Error> {
        let album_dir = album_id.dir_in(self.root());
        if !is_dir(&album_dir).await? {
            return Ok(None);
        }

        let mut photo_ids = Vec::new();
        let mut entries = fs::read_dir(&album_dir).await?;
        while let Some(entry) = entries.next().await {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();
            if let Some(photo_id) = photo_id_from_metadata_file(&file_name) {
                if is_safe_token(photo_id) {
                    photo_ids.push(photo_id.to_string());
                }
            }
        }

        photo_ids.sort();
        Ok(Some(photo_ids))
    }

    async fn get_album_photos(
        &self,
        album_id: &AlbumId,
    ) -> Result<Option<Vec<(PhotoId, PhotoDetail)>>, Error> {
        let photo_ids = match self.get_photo_ids(album_id).await? {
            Some(photo_ids) => photo_ids,
            None => return Ok(None),
        };

        let album_dir = album_id.dir_in(self.root());
        let mut photos = Vec::with_capacity(photo_ids.len());
        for photo_id in photo_ids {
            let stored = match StoredPhoto::in_album(&album_dir, &photo_id) {
                Ok(stored) => stored,
                Err(_) => continue,
            };
            match read_metadata(&stored.metadata_path).await {
                Ok(Some(detail)) => photos.push((photo_id, detail)),
                Ok(None) => {},
                Err(err @ Error::Json { .. }) => {
                    tracing::warn!(album = %album_id, photo = %photo_id, "{}", err)
                },
                Err(err) => return Err(err),
            }
        }

        Ok(Some(photos))
    }

    async fn get_photo_by_id(
        &self,
        album_id: &AlbumId,
        photo_id: &str,
    ) -> Result<Option<(PhotoDetail, Neighbours)>, Error> {
        let album_dir = album_id.dir_in(self.root());
        let stored = match StoredPhoto::in_album(&album_dir, photo_id) {
            Ok(stored) => stored,
            Err(_) => return Ok(None),
        };

        let detail = match read_metadata(&stored.metadata_path).await? {
            Some(detail) => detail,
            None => return Ok(None),
        };

        let photo_ids = self.get_photo_ids(album_id).await?.unwrap_or_default();
        Ok(Some((detail, neighbours(&photo_ids, photo_id))))
    }
}
