//! Error types for the wiki editor.
//!
//! Nothing here is fatal to a page: every variant ends up as an inline
//! indicator (error fragment, button label) or a silently inert feature.

use miette::Diagnostic;

/// Main error type for editor operations.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum EditorError {
    /// The request never produced a usable response (network, CORS, body decode).
    #[error("request to {endpoint} failed: {source}")]
    #[diagnostic(code(wiki_editor::transport))]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{endpoint} answered with status {status}")]
    #[diagnostic(code(wiki_editor::status))]
    Status { endpoint: String, status: u16 },

    /// An upload succeeded but the response names no file.
    #[error("upload response has neither `url` nor `filename`")]
    #[diagnostic(
        code(wiki_editor::upload::missing_url),
        help("the upload endpoint must answer with a `url` or `filename` field")
    )]
    MissingUrl,

    /// Upload was triggered before a file was picked or dropped.
    #[error("no file selected for upload")]
    #[diagnostic(code(wiki_editor::upload::no_file))]
    NoFileSelected,

    /// JSON (config or response) could not be decoded.
    #[error(transparent)]
    #[diagnostic(code(wiki_editor::json))]
    Json(#[from] serde_json::Error),

    /// A configured element id did not resolve.
    #[error("element #{0} is not on this page")]
    #[diagnostic(code(wiki_editor::missing_element))]
    MissingElement(String),

    /// A browser API call threw.
    #[error("browser call failed: {0}")]
    #[diagnostic(code(wiki_editor::platform))]
    Platform(String),
}

impl EditorError {
    pub(crate) fn transport(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            source,
        }
    }
}
