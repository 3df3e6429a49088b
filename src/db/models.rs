use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use bson::{Bson, Document};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Title of the singleton extras entry holding the video carousel.
pub const YT_CAROUSEL_TITLE: &str = "yt_carousel_list";

/// Identifier of a blog document.
///
/// Backed by a MongoDB `ObjectId`, serialized to JSON as its 24-character hex form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlogId(ObjectId);

impl BlogId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for BlogId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for BlogId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl FromStr for BlogId {
    type Err = bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl Serialize for BlogId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlogId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex.parse().map_err(serde::de::Error::custom)
    }
}

/// A blog post stored in the `blogs` collection.
///
/// Known fields are typed; anything else the author supplied at creation
/// is carried verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: BlogId,
    /// `true` when published, `false` when soft-deleted.
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(rename = "subHeading", default, skip_serializing_if = "Option::is_none")]
    pub sub_heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_section_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_section_2: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
    /// Milliseconds since the Unix epoch. Set once at creation.
    #[serde(rename = "updatedAt", default)]
    pub updated_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Blog {
    /// Whether readers without credentials may see this post.
    pub fn is_visible(&self) -> bool {
        self.status
    }

    /// Tags of the post; a post stored without any is treated as untagged.
    pub fn tag_list(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_list().iter().any(|t| t == tag)
    }

    /// Literal, case-sensitive substring match over the four text fields.
    pub fn mentions(&self, query: &str) -> bool {
        [
            &self.heading,
            &self.sub_heading,
            &self.text_section_1,
            &self.text_section_2,
        ]
        .into_iter()
        .flatten()
        .any(|text| text.contains(query))
    }
}

/// A blog post that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlog {
    pub status: bool,
    pub tags: Option<Vec<String>>,
    pub heading: Option<String>,
    pub sub_heading: Option<String>,
    pub text_section_1: Option<String>,
    pub text_section_2: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub extra: Map<String, Value>,
}

impl NewBlog {
    /// Build a published post from caller-supplied details.
    ///
    /// `createdAt`, `updatedAt` and `status` are always overridden and a
    /// caller-supplied `_id` is dropped. A known field of the wrong shape is
    /// left in `extra` untouched.
    pub fn from_details(mut details: Map<String, Value>, now_millis: i64) -> Self {
        for reserved in ["_id", "createdAt", "updatedAt", "status"] {
            details.remove(reserved);
        }

        Self {
            status: true,
            tags: take_json(&mut details, "tags", json_tags),
            heading: take_json(&mut details, "heading", json_text),
            sub_heading: take_json(&mut details, "subHeading", json_text),
            text_section_1: take_json(&mut details, "text_section_1", json_text),
            text_section_2: take_json(&mut details, "text_section_2", json_text),
            created_at: now_millis,
            updated_at: now_millis,
            extra: details,
        }
    }

    pub fn into_blog(self, id: BlogId) -> Blog {
        Blog {
            id,
            status: self.status,
            tags: self.tags,
            heading: self.heading,
            sub_heading: self.sub_heading,
            text_section_1: self.text_section_1,
            text_section_2: self.text_section_2,
            created_at: self.created_at,
            updated_at: self.updated_at,
            extra: self.extra,
        }
    }
}

/// Remove `key` from `details` when `decode` accepts it; otherwise leave it in place.
fn take_json<T>(
    details: &mut Map<String, Value>,
    key: &str,
    decode: fn(&Value) -> Option<T>,
) -> Option<T> {
    let decoded = decode(details.get(key)?);
    if decoded.is_some() || details.get(key).is_some_and(Value::is_null) {
        details.remove(key);
    }
    decoded
}

fn json_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn json_tags(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// An entry of the `extras` collection, keyed by `title`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrasEntry {
    pub title: String,
    #[serde(default)]
    pub list: Vec<Value>,
}

/// Counts reported by the store for a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

impl UpdateOutcome {
    /// Succeeds only when every matched document was actually modified.
    pub fn require_modified(self) -> Result<(), AppError> {
        if self.matched == self.modified {
            Ok(())
        } else {
            Err(AppError::UpdateMismatch {
                matched: self.matched,
                modified: self.modified,
            })
        }
    }
}

// -- BSON conversion --
//
// Blogs are schema-less past their known fields, so the MongoDB adapters work
// on raw `bson::Document`s and convert at the boundary.

/// Decode a stored blog document.
pub fn blog_from_document(mut doc: Document) -> Result<Blog, AppError> {
    let id = match doc.remove("_id") {
        Some(Bson::ObjectId(oid)) => BlogId(oid),
        other => {
            return Err(AppError::Database(format!(
                "blog document has no ObjectId _id (found {other:?})"
            )))
        }
    };

    let status = take_bson(&id, &mut doc, "status", Bson::as_bool).unwrap_or(false);
    let tags = take_bson(&id, &mut doc, "tags", bson_tags);
    let heading = take_bson(&id, &mut doc, "heading", bson_text);
    let sub_heading = take_bson(&id, &mut doc, "subHeading", bson_text);
    let text_section_1 = take_bson(&id, &mut doc, "text_section_1", bson_text);
    let text_section_2 = take_bson(&id, &mut doc, "text_section_2", bson_text);
    let created_at = take_bson(&id, &mut doc, "createdAt", bson_millis).unwrap_or(0);
    let updated_at = take_bson(&id, &mut doc, "updatedAt", bson_millis).unwrap_or(0);

    let extra = doc
        .into_iter()
        .map(|(key, value)| (key, value.into_relaxed_extjson()))
        .collect();

    Ok(Blog {
        id,
        status,
        tags,
        heading,
        sub_heading,
        text_section_1,
        text_section_2,
        created_at,
        updated_at,
        extra,
    })
}

/// Encode a new blog for insertion. The store assigns `_id`.
pub fn new_blog_to_document(blog: &NewBlog) -> Result<Document, AppError> {
    let mut doc = Document::new();
    for (key, value) in &blog.extra {
        doc.insert(key.clone(), json_to_bson(value)?);
    }
    if let Some(tags) = &blog.tags {
        doc.insert("tags", tags.clone());
    }
    let texts = [
        ("heading", &blog.heading),
        ("subHeading", &blog.sub_heading),
        ("text_section_1", &blog.text_section_1),
        ("text_section_2", &blog.text_section_2),
    ];
    for (key, value) in texts {
        if let Some(text) = value {
            doc.insert(key, text.clone());
        }
    }
    doc.insert("createdAt", blog.created_at);
    doc.insert("updatedAt", blog.updated_at);
    doc.insert("status", blog.status);
    Ok(doc)
}

/// Decode an extras entry. A missing `list` decodes as empty.
pub fn extras_from_document(mut doc: Document) -> Result<ExtrasEntry, AppError> {
    let title = match doc.remove("title") {
        Some(Bson::String(title)) => title,
        other => {
            return Err(AppError::Database(format!(
                "extras entry has no string title (found {other:?})"
            )))
        }
    };
    let list = match doc.remove("list") {
        None | Some(Bson::Null) => Vec::new(),
        Some(Bson::Array(items)) => items.into_iter().map(Bson::into_relaxed_extjson).collect(),
        Some(other) => {
            return Err(AppError::Database(format!(
                "extras entry '{title}': list must be an array, found {other}"
            )))
        }
    };
    Ok(ExtrasEntry { title, list })
}

pub fn json_to_bson(value: &Value) -> Result<Bson, AppError> {
    bson::to_bson(value).map_err(|e| AppError::Internal(format!("Failed to encode value: {e}")))
}

/// Known fields that `Blog` always serializes; a malformed stored value is
/// dropped rather than passed through, so the JSON form never repeats a key.
const ALWAYS_PRESENT: [&str; 3] = ["status", "createdAt", "updatedAt"];

/// Remove `key` from `doc` when `decode` accepts it.
///
/// A value of the wrong type decodes as absent and, unless the field is
/// always present on `Blog`, stays in `doc` to pass through as `extra`.
fn take_bson<T>(
    id: &BlogId,
    doc: &mut Document,
    key: &str,
    decode: fn(&Bson) -> Option<T>,
) -> Option<T> {
    let value = doc.get(key)?;
    if matches!(value, Bson::Null) {
        doc.remove(key);
        return None;
    }

    let decoded = decode(value);
    if decoded.is_none() {
        tracing::warn!(blog_id = %id, field = key, found = %value, "Ignoring malformed blog field");
    }
    if decoded.is_some() || ALWAYS_PRESENT.contains(&key) {
        doc.remove(key);
    }
    decoded
}

fn bson_text(value: &Bson) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn bson_tags(value: &Bson) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// Milliseconds since the epoch from any numeric or date encoding.
///
/// Doubles are rounded; NaN, infinities and values outside `i64` are rejected.
fn bson_millis(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int64(millis) => Some(*millis),
        Bson::Int32(millis) => Some(i64::from(*millis)),
        Bson::Double(millis) => {
            let rounded = millis.round();
            (rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64)
                .then_some(rounded as i64)
        }
        Bson::DateTime(at) => Some(at.timestamp_millis()),
        _ => None,
    }
}
