use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::collections::config::SyncConfig;
use crate::collections::member::{CollectionId, Member, MemberId};
use crate::collections::pager::MembershipSource;
use crate::collections::sentences::SentenceSample;
use crate::error::UpstreamError;
use crate::mediacloud::types::{
    MediaItem, MediaTagWrite, SentenceListResponse, Tag, TagEnvelope, TagSet, TagWrite,
};

const ERROR_BODY_MAX_CHARS: usize = 200;

/// Trim an upstream error body to something that fits on one log line.
fn snippet(body: &str) -> String {
    let clean: String = body.chars().filter(|c| !c.is_control()).collect();
    if clean.chars().count() > ERROR_BODY_MAX_CHARS {
        let mut s: String = clean.chars().take(ERROR_BODY_MAX_CHARS).collect();
        s.push('…');
        s
    } else {
        clean
    }
}

/// Blocking client for the media-indexing service. Every request carries
/// the caller's API key; the upstream scopes visibility and write
/// permission to that key.
pub struct MediaCloudClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl MediaCloudClient {
    pub fn new(config: &SyncConfig, api_key: &str) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn check(response: Response) -> Result<Response, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(UpstreamError::Status {
            status,
            body: snippet(&body),
        })
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(self.url(path))
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()?;
        let value: Value = Self::check(response)?.json()?;
        serde_json::from_value(value).map_err(|err| UpstreamError::Decode(err.to_string()))
    }

    fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, UpstreamError> {
        let response = self
            .http
            .post(self.url(path))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()?;
        let value: Value = Self::check(response)?.json()?;
        serde_json::from_value(value).map_err(|err| UpstreamError::Decode(err.to_string()))
    }

    /// Collection (tag) metadata. `tags/single` answers with a one-element
    /// list.
    pub fn tag(&self, collection_id: CollectionId) -> Result<Tag, UpstreamError> {
        let mut tags: Vec<Tag> = self.get(&format!("tags/single/{collection_id}"), &[])?;
        tags.pop().ok_or_else(|| {
            UpstreamError::Decode(format!("tags/single/{collection_id} returned no tag"))
        })
    }

    pub fn tag_set(&self, tag_set_id: u64) -> Result<TagSet, UpstreamError> {
        let mut sets: Vec<TagSet> = self.get(&format!("tag_sets/single/{tag_set_id}"), &[])?;
        sets.pop().ok_or_else(|| {
            UpstreamError::Decode(format!("tag_sets/single/{tag_set_id} returned no tag set"))
        })
    }

    /// Collections within a tag set, optionally restricted to public ones.
    pub fn list_collections(
        &self,
        tag_set_id: u64,
        rows: usize,
        public_only: bool,
    ) -> Result<Vec<Tag>, UpstreamError> {
        let mut query = vec![
            ("tag_sets_id", tag_set_id.to_string()),
            ("rows", rows.to_string()),
        ];
        if public_only {
            query.push(("public", "1".to_string()));
        }
        self.get("tags/list", &query)
    }

    /// Keyword search over media sources. `keyword = None` lists without a
    /// name filter; `collection` restricts matches to one collection's
    /// members.
    pub fn media_search(
        &self,
        keyword: Option<&str>,
        collection: Option<CollectionId>,
        rows: usize,
    ) -> Result<Vec<MediaItem>, UpstreamError> {
        let mut query = vec![("rows", rows.to_string())];
        if let Some(keyword) = keyword {
            query.push(("name", keyword.to_string()));
        }
        if let Some(collection) = collection {
            query.push(("tags_id", collection.to_string()));
        }
        self.get("media/list", &query)
    }

    pub fn create_tag(&self, write: &TagWrite) -> Result<Tag, UpstreamError> {
        let envelope: TagEnvelope = self.post("tags/create", write)?;
        Ok(envelope.tag)
    }

    pub fn update_tag(&self, write: &TagWrite) -> Result<Tag, UpstreamError> {
        let envelope: TagEnvelope = self.post("tags/update", write)?;
        Ok(envelope.tag)
    }

    /// Submit a membership batch. The upstream applies entries in no
    /// particular order.
    pub fn put_media_tags(&self, writes: &[MediaTagWrite]) -> Result<(), UpstreamError> {
        let _: Value = self.post("media/put_tags", &writes)?;
        Ok(())
    }
}

impl MembershipSource for MediaCloudClient {
    fn list_members_page(
        &self,
        collection_id: CollectionId,
        after_id: MemberId,
        page_size: usize,
    ) -> Result<Vec<Member>, UpstreamError> {
        let items: Vec<MediaItem> = self.get(
            "media/list",
            &[
                ("tags_id", collection_id.to_string()),
                ("last_media_id", after_id.to_string()),
                ("rows", page_size.to_string()),
            ],
        )?;
        Ok(items.into_iter().map(Member::from).collect())
    }
}

impl SentenceSample for MediaCloudClient {
    fn sample_sentence_media_ids(
        &self,
        collection_id: CollectionId,
        rows: usize,
    ) -> Result<Vec<MemberId>, UpstreamError> {
        let parsed: SentenceListResponse = self.get(
            "sentences/list",
            &[
                ("q", "*".to_string()),
                ("fq", format!("tags_id_media:{collection_id}")),
                ("rows", rows.to_string()),
                ("sort", "random".to_string()),
            ],
        )?;
        Ok(parsed.response.docs.into_iter().map(|d| d.media_id).collect())
    }
}
