use serde::{Deserialize, Serialize};

use crate::collections::member::{CollectionId, Member};
use crate::collections::reconcile::TagOp;

/// A media source as the upstream returns it from `media/list`. Responses
/// carry many more fields; only these matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaItem {
    pub media_id: u64,
    pub name: String,
    pub url: String,
}

impl From<MediaItem> for Member {
    fn from(item: MediaItem) -> Self {
        Member {
            id: item.media_id,
            name: item.name,
            url: item.url,
        }
    }
}

/// A tag, which is how the upstream models a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub tags_id: u64,
    pub tag: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub tag_sets_id: u64,
    #[serde(default)]
    pub show_on_stories: Option<bool>,
    #[serde(default)]
    pub show_on_media: Option<bool>,
    #[serde(default)]
    pub is_static: Option<bool>,
}

impl Tag {
    /// Human-readable name, falling back to the short tag name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.tag)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSet {
    pub tag_sets_id: u64,
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
}

/// Write envelope for `tags/create` and `tags/update`.
#[derive(Debug, Clone, Serialize)]
pub struct TagWrite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_sets_id: Option<u64>,
    pub tag: String,
    pub label: String,
    pub description: String,
    pub is_static: bool,
    pub show_on_stories: bool,
    pub show_on_media: bool,
}

#[derive(Debug, Deserialize)]
pub struct TagEnvelope {
    pub tag: Tag,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagAction {
    Add,
    Remove,
}

/// One entry of a `media/put_tags` batch.
#[derive(Debug, Clone, Serialize)]
pub struct MediaTagWrite {
    pub media_id: u64,
    pub tags_id: u64,
    pub action: TagAction,
}

impl MediaTagWrite {
    pub fn from_op(op: TagOp, collection_id: CollectionId) -> Self {
        match op {
            TagOp::Add(media_id) => Self {
                media_id,
                tags_id: collection_id,
                action: TagAction::Add,
            },
            TagOp::Remove(media_id) => Self {
                media_id,
                tags_id: collection_id,
                action: TagAction::Remove,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SentenceListResponse {
    pub response: SentenceDocs,
}

#[derive(Debug, Deserialize)]
pub struct SentenceDocs {
    pub docs: Vec<SentenceDoc>,
}

#[derive(Debug, Deserialize)]
pub struct SentenceDoc {
    pub media_id: u64,
}
