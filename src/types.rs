use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// The photo's owner as recorded at resolution time. Each item carries its
/// own copy; owners are not deduplicated across items.
#[derive(Debug, Clone, Serialize)]
pub struct Owner {
    pub id: String,
    pub username: String,
    pub name: String,
}

/// A fully resolved photo: metadata plus the chosen source variant.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub owner: Owner,
    pub tags: Vec<String>,
    pub url: String,
    /// URL of the selected resolution variant; not part of the persisted schema.
    #[serde(skip)]
    pub source: String,
}
