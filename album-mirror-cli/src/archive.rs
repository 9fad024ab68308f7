use std::path::{Path, PathBuf};

use album_mirror_api_structs::{AlbumId, PhotoDetail, PhotoId, PhotoSummary, SizeUrls, StoredPhoto};
use async_std::fs::{self, File};
use async_std::prelude::*;
use serde::Serialize;

use crate::flickr::PhotoApi;
use crate::{Error, Exit};

#[derive(Debug, Default)]
pub struct ArchiveReport {
    pub album_dir: PathBuf,
    pub archived: Vec<PhotoId>,
    pub failed: Vec<(PhotoId, String)>,
}

impl ArchiveReport {
    pub fn total(&self) -> usize {
        self.archived.len() + self.failed.len()
    }
}

pub fn select_best_url(sizes: &SizeUrls) -> Result<&str, Error> {
    let candidates = sizes.by_preference();
    candidates
        .iter()
        .flatten()
        .next()
        .copied()
        .ok_or(Error::NoDownloadableUrl)
}

/// Streams `url` into `destination`, replacing whatever was there.
pub async fn persist_photo<A>(api: &A, url: &str, destination: &Path) -> Result<u64, Error>
where
    A: PhotoApi + ?Sized,
{
    let mut body = api.open_download(url).await?;
    let mut file = File::create(destination).await?;
    let written = async_std::io::copy(&mut body, &mut file).await?;
    file.flush().await?;
    Ok(written)
}

pub async fn persist_metadata(detail: &PhotoDetail, destination: &Path) -> Result<(), Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    detail.serialize(&mut serializer)?;

    fs::write(destination, buf).await?;
    Ok(())
}

/// Mirrors one album into `<albums_root>/<album_id>`.
///
/// Failing to list the album is fatal. Anything going wrong with a single
/// photo is logged and recorded in the report, and the next photo is tried.
pub async fn archive_album<A>(
    api: &A,
    albums_root: &Path,
    album_id: &AlbumId,
) -> Result<ArchiveReport, Error>
where
    A: PhotoApi + ?Sized,
{
    let photos = api.list_album_photos(album_id).await?;
    log::info!("Album {} has {} photos", album_id, photos.len());

    let album_dir = album_id.dir_in(albums_root);
    fs::create_dir_all(&album_dir).await?;

    let mut report = ArchiveReport {
        album_dir,
        ..Default::default()
    };

    for summary in &photos {
        match archive_photo(api, &report.album_dir, summary).await {
            Ok(_) => report.archived.push(summary.id.clone()),
            Err(err) => {
                log::warn!("Error processing photo {}: {}", summary.id, err);
                report.failed.push((summary.id.clone(), err.to_string()));
            },
        }
    }

    Ok(report)
}

/// Runs [`archive_album`] and reduces the outcome to the process exit status.
/// A fatal error is left for [`Exit`] to report.
pub async fn fetch_album<A>(api: &A, albums_root: &Path, album_id: &AlbumId) -> Exit<Error>
where
    A: PhotoApi + ?Sized,
{
    let report = match archive_album(api, albums_root, album_id).await {
        Ok(report) => report,
        Err(err) => return Exit::Err(err),
    };

    log::info!(
        "Archived {} of {} photos into {}",
        report.archived.len(),
        report.total(),
        report.album_dir.display()
    );
    if !report.failed.is_empty() {
        let skipped: Vec<&str> = report.failed.iter().map(|(id, _)| id.as_str()).collect();
        log::warn!("Skipped photos: {}", skipped.join(", "));
    }

    Exit::Ok
}

async fn archive_photo<A>(
    api: &A,
    album_dir: &Path,
    summary: &PhotoSummary,
) -> Result<StoredPhoto, Error>
where
    A: PhotoApi + ?Sized,
{
    let stored = StoredPhoto::in_album(album_dir, &summary.id)?;

    log::info!("Fetching detailed info for photo ID {}...", summary.id);
    let detail = api.fetch_photo_detail(&summary.id).await?;

    // The image URL comes from the listing, not from the detail record.
    let url = select_best_url(&summary.sizes)?;

    log::info!(
        "Downloading photo {} to {}...",
        url,
        stored.image_path.display()
    );
    let written = persist_photo(api, url, &stored.image_path).await?;
    log::debug!("Wrote {} bytes", written);

    log::info!("Saving metadata to {}...", stored.metadata_path.display());
    persist_metadata(&detail, &stored.metadata_path).await?;

    Ok(stored)
}
