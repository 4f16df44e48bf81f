use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One page of search results plus the declared total-page count.
///
/// `pages` is re-read from every response; the service may revise it while
/// a crawl is in flight.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    pub page: u64,
    pub pages: u64,
    #[serde(rename = "photo", default)]
    pub hits: Vec<SearchHit>,
}

/// A raw search-result entry, before metadata enrichment.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: String,
    #[serde(default)]
    pub secret: String,
    pub owner: String,
    #[serde(default)]
    pub title: String,
}

/// The `flickr.photos.getInfo` payload, reduced to the fields we keep.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoInfo {
    pub owner: InfoOwner,
    #[serde(default)]
    pub tags: TagList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoOwner {
    #[serde(default)]
    pub path_alias: Option<String>,
    #[serde(default)]
    pub realname: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagList {
    #[serde(rename = "tag", default)]
    pub entries: Vec<TagEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagEntry {
    pub raw: String,
    #[serde(rename = "machine_tag", default, deserialize_with = "machine_flag")]
    pub machine: bool,
}

/// One available resolution of an image asset.
#[derive(Debug, Clone, Deserialize)]
pub struct SizeVariant {
    pub label: String,
    pub source: String,
}

/// The service encodes the machine-tag flag as a bool, an integer, or a
/// string depending on the endpoint version.
fn machine_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_i64().unwrap_or(0) != 0),
        Value::String(s) => Ok(s == "1" || s.eq_ignore_ascii_case("true")),
        Value::Null => Ok(false),
        other => Err(D::Error::custom(format!(
            "invalid machine_tag flag: {other}"
        ))),
    }
}
