use thiserror::Error;

/// Errors reported by the catalog client.
///
/// `Api` is the service's own failure envelope (`stat != "ok"`); the other
/// variants cover transport failures and replies whose shape doesn't match
/// the endpoint's contract.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("http status {0}")]
    Status(u16),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Shape(&'static str),
}
