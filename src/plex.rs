use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// `streamType` of a video track.
pub const VIDEO_STREAM_TYPE: i64 = 1;

/// A modeled JSON field that remembers whether it was absent, `null`, or set,
/// so a decode/encode round trip writes back exactly what came in.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl Field<String> {
    /// The string value, or `""` when absent or null.
    pub fn as_str(&self) -> &str {
        self.as_ref().map(String::as_str).unwrap_or_default()
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Value(value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|v| v.map_or(Field::Null, Field::Value))
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(v) => v.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Stream {
    #[serde(rename = "streamType", default, skip_serializing_if = "Field::is_absent")]
    pub stream_type: Field<Number>,
    #[serde(rename = "displayTitle", default, skip_serializing_if = "Field::is_absent")]
    pub display_title: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub title: Field<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stream {
    pub fn is_video(&self) -> bool {
        self.stream_type.as_ref().and_then(Number::as_i64) == Some(VIDEO_STREAM_TYPE)
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Part {
    #[serde(rename = "Stream", default, skip_serializing_if = "Field::is_absent")]
    pub streams: Field<Vec<Stream>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One encoded rendition of a metadata item.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Media {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub title: Field<String>,
    /// File format of the rendition, e.g. `mkv`.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub container: Field<String>,
    #[serde(rename = "Part", default, skip_serializing_if = "Field::is_absent")]
    pub parts: Field<Vec<Part>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A movie, episode or other library item.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(rename = "Media", default, skip_serializing_if = "Field::is_absent")]
    pub media: Field<Vec<Media>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MediaContainer {
    #[serde(rename = "Metadata", default, skip_serializing_if = "Field::is_absent")]
    pub metadata: Field<Vec<Metadata>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a `/library/metadata/...` response.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Container {
    #[serde(rename = "MediaContainer", default, skip_serializing_if = "Field::is_absent")]
    pub media_container: Field<MediaContainer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
