use album_mirror_api_structs::{AlbumId, PhotoDetail, PhotoId};
use serde::Serialize;
use url::Url;

use crate::library::albums::Neighbours;

#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub albums: Vec<AlbumId>,
}

#[derive(Debug, Serialize)]
pub struct PhotoCard {
    pub id: PhotoId,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct AlbumPage {
    pub album_id: AlbumId,
    pub photos: Vec<PhotoCard>,
}

impl AlbumPage {
    pub fn new(album_id: AlbumId, photos: Vec<(PhotoId, PhotoDetail)>) -> Self {
        AlbumPage {
            album_id,
            photos: photos
                .into_iter()
                .map(|(id, detail)| PhotoCard {
                    id,
                    title: detail.title.content,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PhotoPage {
    pub album_id: AlbumId,
    pub photo_id: PhotoId,
    pub title: String,
    pub description: String,
    pub date_taken: String,
    pub owner: String,
    pub owner_url: String,
    pub original_link: Option<String>,
    pub prev_photo: Option<PhotoId>,
    pub next_photo: Option<PhotoId>,
}

impl PhotoPage {
    pub fn new(
        album_id: AlbumId,
        photo_id: PhotoId,
        detail: PhotoDetail,
        neighbours: Neighbours,
        profile_host: &Url,
    ) -> Self {
        let owner_url = format!(
            "{}/photos/{}",
            profile_host.as_str().trim_end_matches('/'),
            detail.owner.nsid
        );

        PhotoPage {
            album_id,
            photo_id,
            original_link: detail.original_page().map(str::to_string),
            title: detail.title.content,
            description: detail.description.content,
            date_taken: detail.dates.taken,
            owner: detail.owner.username,
            owner_url,
            prev_photo: neighbours.previous,
            next_photo: neighbours.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_page_projects_detail() {
        let detail: PhotoDetail = serde_json::from_str(
            r#"{
                "id": "2",
                "title": {"_content": "Pier"},
                "description": {"_content": "Low tide"},
                "dates": {"taken": "2023-11-02 17:41:09"},
                "owner": {"nsid": "12345678@N00", "username": "kyrias"},
                "urls": {"url": [{"type": "photopage", "_content": "https://www.flickr.com/photos/kyrias/2/"}]}
            }"#,
        )
        .unwrap();
        let neighbours = Neighbours {
            previous: Some("10".to_string()),
            next: None,
        };

        let page = PhotoPage::new(
            "album".parse().unwrap(),
            "2".to_string(),
            detail,
            neighbours,
            &Url::parse("https://www.flickr.com/").unwrap(),
        );

        assert_eq!(page.title, "Pier");
        assert_eq!(page.description, "Low tide");
        assert_eq!(page.date_taken, "2023-11-02 17:41:09");
        assert_eq!(page.owner, "kyrias");
        assert_eq!(page.owner_url, "https://www.flickr.com/photos/12345678@N00");
        assert_eq!(
            page.original_link.as_deref(),
            Some("https://www.flickr.com/photos/kyrias/2/")
        );
        assert_eq!(page.prev_photo.as_deref(), Some("10"));
        assert_eq!(page.next_photo, None);
    }
}
