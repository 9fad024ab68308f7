use std::convert::TryFrom;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const IMAGE_EXTENSION: &str = "jpg";
pub const METADATA_EXTENSION: &str = "json";

pub type PhotoId = String;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0:?} is not a valid album or photo identifier")]
pub struct InvalidToken(pub String);

/// Whether `token` can be used verbatim as a single path component.
///
/// Only ASCII letters, digits, `-`, `_` and `@` are accepted, so a token can
/// never be `.`, `..` or contain a separator.
pub fn is_safe_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'@')
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlbumId(String);

impl AlbumId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory holding this album's photos below `albums_root`.
    pub fn dir_in(&self, albums_root: &Path) -> PathBuf {
        albums_root.join(&self.0)
    }
}

impl TryFrom<String> for AlbumId {
    type Error = InvalidToken;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_safe_token(&value) {
            Ok(AlbumId(value))
        } else {
            Err(InvalidToken(value))
        }
    }
}

impl FromStr for AlbumId {
    type Err = InvalidToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlbumId::try_from(s.to_string())
    }
}

impl From<AlbumId> for String {
    fn from(id: AlbumId) -> String {
        id.0
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `<id>.jpg` / `<id>.json` pair a photo occupies inside an album directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredPhoto {
    pub image_path: PathBuf,
    pub metadata_path: PathBuf,
}

impl StoredPhoto {
    pub fn in_album(album_dir: &Path, photo_id: &str) -> Result<Self, InvalidToken> {
        if !is_safe_token(photo_id) {
            return Err(InvalidToken(photo_id.to_string()));
        }

        Ok(StoredPhoto {
            image_path: album_dir.join(format!("{}.{}", photo_id, IMAGE_EXTENSION)),
            metadata_path: album_dir.join(format!("{}.{}", photo_id, METADATA_EXTENSION)),
        })
    }
}

/// Photo id encoded in a metadata file name, if `file_name` is one.
pub fn photo_id_from_metadata_file(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(METADATA_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
}

/// Size URLs requested through the listing call's `extras` parameter.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SizeUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_o: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_l: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_z: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_m: Option<String>,
}

impl SizeUrls {
    pub const EXTRAS: &'static str = "url_o,url_l,url_c,url_z,url_m";

    /// Candidates from most to least preferred: original, large,
    /// medium 800, medium 640 ("z"), medium 500.
    pub fn by_preference(&self) -> [Option<&str>; 5] {
        [
            self.url_o.as_deref(),
            self.url_l.as_deref(),
            self.url_c.as_deref(),
            self.url_z.as_deref(),
            self.url_m.as_deref(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PhotoSummary {
    pub id: PhotoId,
    /// Position in the remote album; not part of the remote payload.
    #[serde(default)]
    pub index: usize,
    #[serde(flatten)]
    pub sizes: SizeUrls,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Content {
    #[serde(rename = "_content", default)]
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Dates {
    #[serde(default)]
    pub taken: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Owner {
    #[serde(default)]
    pub nsid: String,
    #[serde(default)]
    pub username: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PhotoUrl {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "_content")]
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Urls {
    #[serde(default)]
    pub url: Vec<PhotoUrl>,
}

/// The `photo` object of a `flickr.photos.getInfo` response, stored as-is
/// next to the image.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PhotoDetail {
    pub id: PhotoId,
    #[serde(default)]
    pub title: Content,
    #[serde(default)]
    pub description: Content,
    #[serde(default)]
    pub dates: Dates,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default)]
    pub urls: Urls,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PhotoDetail {
    /// Link to the photo's page on the remote site.
    pub fn original_page(&self) -> Option<&str> {
        self.urls.url.first().map(|url| url.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GET_INFO_PHOTO: &str = r#"{
        "id": "53123456789",
        "secret": "abcdef",
        "server": "65535",
        "title": {"_content": "Harbour at dusk"},
        "description": {"_content": "Taken from the pier"},
        "dates": {"posted": "1700000000", "taken": "2023-11-02 17:41:09", "takengranularity": 0},
        "owner": {"nsid": "12345678@N00", "username": "kyrias", "realname": "", "location": null},
        "urls": {"url": [{"type": "photopage", "_content": "https://www.flickr.com/photos/kyrias/53123456789/"}]},
        "views": "42"
    }"#;

    #[test]
    fn safe_tokens() {
        assert!(is_safe_token("72157719836437842"));
        assert!(is_safe_token("12345678@N00"));
        assert!(is_safe_token("summer_2023-b"));
        assert!(!is_safe_token(""));
        assert!(!is_safe_token(".."));
        assert!(!is_safe_token("a/b"));
        assert!(!is_safe_token("a\\b"));
        assert!(!is_safe_token("photo.json"));
    }

    #[test]
    fn album_id_rejects_path_components() {
        assert!("72157719836437842".parse::<AlbumId>().is_ok());
        assert_eq!(
            "../etc".parse::<AlbumId>(),
            Err(InvalidToken("../etc".to_string()))
        );
        assert!(serde_json::from_str::<AlbumId>("\"a/b\"").is_err());
    }

    #[test]
    fn stored_photo_paths() {
        let stored = StoredPhoto::in_album(Path::new("albums/1"), "42").unwrap();
        assert_eq!(stored.image_path, Path::new("albums/1/42.jpg"));
        assert_eq!(stored.metadata_path, Path::new("albums/1/42.json"));
        assert!(StoredPhoto::in_album(Path::new("albums/1"), "../42").is_err());
    }

    #[test]
    fn metadata_file_names() {
        assert_eq!(photo_id_from_metadata_file("42.json"), Some("42"));
        assert_eq!(photo_id_from_metadata_file("42.jpg"), None);
        assert_eq!(photo_id_from_metadata_file("42json"), None);
        assert_eq!(photo_id_from_metadata_file(".json"), None);
    }

    #[test]
    fn photo_detail_keeps_unknown_fields() {
        let detail: PhotoDetail = serde_json::from_str(GET_INFO_PHOTO).unwrap();
        assert_eq!(detail.title.content, "Harbour at dusk");
        assert_eq!(detail.description.content, "Taken from the pier");
        assert_eq!(detail.dates.taken, "2023-11-02 17:41:09");
        assert_eq!(detail.owner.username, "kyrias");
        assert_eq!(detail.owner.nsid, "12345678@N00");
        assert_eq!(
            detail.original_page(),
            Some("https://www.flickr.com/photos/kyrias/53123456789/")
        );

        let reserialized = serde_json::to_value(&detail).unwrap();
        let original: Value = serde_json::from_str(GET_INFO_PHOTO).unwrap();
        assert_eq!(reserialized, original);
    }

    #[test]
    fn photo_summary_splits_sizes_from_other_fields() {
        let summary: PhotoSummary = serde_json::from_str(
            r#"{"id": "1", "title": "one", "url_l": "https://live.staticflickr.com/1_l.jpg", "height_l": 768}"#,
        )
        .unwrap();

        assert_eq!(summary.index, 0);
        assert_eq!(
            summary.sizes.url_l.as_deref(),
            Some("https://live.staticflickr.com/1_l.jpg")
        );
        assert!(summary.sizes.url_o.is_none());
        assert_eq!(summary.extra.get("title"), Some(&Value::from("one")));
        assert!(!summary.extra.contains_key("url_l"));
    }
}
