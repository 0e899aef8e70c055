//! Calls to the wiki service: markdown rendering and image upload.
//!
//! The preview and upload flows only see the two traits, so tests drive them
//! with in-memory fakes. `HttpWikiClient` is the reqwest implementation used
//! on the page.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::upload::UploadResponse;

/// Renders markdown to an HTML fragment.
pub trait RenderClient {
    fn render(&self, content: &str) -> impl Future<Output = Result<String, EditorError>>;
}

/// Stores an uploaded file and says where it can be fetched.
pub trait UploadClient {
    fn upload(&self, file: UploadFile) -> impl Future<Output = Result<UploadResponse, EditorError>>;
}

/// A file read off a picker or a drop, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// MIME type reported by the browser; empty when unknown.
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct RenderResponse {
    #[serde(default)]
    html: String,
}

/// Join a service base URL and an endpoint path.
///
/// Absolute endpoints are used as given.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[derive(Debug, Clone)]
pub struct HttpWikiClient {
    pub client: reqwest::Client,
    render_url: String,
    upload_url: String,
}

impl HttpWikiClient {
    pub fn new(base_url: &str, render_endpoint: &str, upload_endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            render_url: endpoint_url(base_url, render_endpoint),
            upload_url: endpoint_url(base_url, upload_endpoint),
        }
    }

    pub fn render_url(&self) -> &str {
        &self.render_url
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

fn check_status(endpoint: &str, response: &reqwest::Response) -> Result<(), EditorError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(EditorError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        })
    }
}

impl RenderClient for HttpWikiClient {
    async fn render(&self, content: &str) -> Result<String, EditorError> {
        let url = &self.render_url;
        let response = self
            .client
            .post(url)
            .json(&RenderRequest { content })
            .send()
            .await
            .map_err(|e| EditorError::transport(url, e))?;
        check_status(url, &response)?;

        let body: RenderResponse = response
            .json()
            .await
            .map_err(|e| EditorError::transport(url, e))?;
        Ok(body.html)
    }
}

impl UploadClient for HttpWikiClient {
    async fn upload(&self, file: UploadFile) -> Result<UploadResponse, EditorError> {
        use reqwest::multipart::{Form, Part};

        let url = &self.upload_url;
        let size = file.bytes.len();
        let mut part = Part::bytes(file.bytes).file_name(file.name.clone());
        if !file.mime.is_empty() {
            part = part
                .mime_str(&file.mime)
                .map_err(|e| EditorError::transport(url, e))?;
        }

        tracing::debug!(name = %file.name, size, "uploading file");
        let response = self
            .client
            .post(url)
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(|e| EditorError::transport(url, e))?;
        check_status(url, &response)?;

        response
            .json()
            .await
            .map_err(|e| EditorError::transport(url, e))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::upload::{BeginOutcome, UploadInserter, UploadOutcome, UploadSettings};
    use crate::{EditorDocument, EditorRope, PlainEditor, Selection};

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://wiki.local/", "/render_markdown"),
            "http://wiki.local/render_markdown"
        );
        assert_eq!(endpoint_url("http://wiki.local", "upload"), "http://wiki.local/upload");
        assert_eq!(
            endpoint_url("http://wiki.local", "https://cdn.example/upload"),
            "https://cdn.example/upload"
        );
    }

    #[test]
    fn test_client_urls() {
        let client = HttpWikiClient::new("http://wiki.local", "/render_markdown", "/upload");
        assert_eq!(client.render_url(), "http://wiki.local/render_markdown");
        assert_eq!(client.upload_url(), "http://wiki.local/upload");
    }

    #[test]
    fn test_render_body_shapes() {
        let request = serde_json::to_string(&RenderRequest { content: "# hi" }).unwrap();
        assert_eq!(request, r##"{"content":"# hi"}"##);

        let response: RenderResponse = serde_json::from_str(r#"{"html":"<h1>hi</h1>"}"#).unwrap();
        assert_eq!(response.html, "<h1>hi</h1>");

        // A body without `html` renders as empty rather than failing.
        let response: RenderResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.html, "");
    }

    /// Records what was sent and answers with a fixed filename.
    #[derive(Default)]
    struct FakeUploads {
        sent: RefCell<Vec<UploadFile>>,
    }

    impl UploadClient for FakeUploads {
        async fn upload(&self, file: UploadFile) -> Result<UploadResponse, EditorError> {
            self.sent.borrow_mut().push(file);
            Ok(UploadResponse {
                url: None,
                filename: Some("cat.png".into()),
            })
        }
    }

    #[tokio::test]
    async fn test_upload_through_client_inserts_reference() {
        let client = FakeUploads::default();
        let mut inserter = UploadInserter::new(UploadSettings::default(), "Загрузить");
        let mut editor = PlainEditor::new(EditorRope::from_str("see: "));
        editor.set_selection(Selection::collapsed(5));

        inserter.select(UploadFile {
            name: "cat.png".into(),
            mime: "image/png".into(),
            bytes: vec![1, 2, 3],
        });
        let BeginOutcome::Upload { file, .. } = inserter.begin() else {
            panic!("upload should start");
        };
        let result = client.upload(file).await;
        let finished = inserter.finish(result, &mut editor);

        assert!(matches!(finished.outcome, UploadOutcome::Uploaded { .. }));
        assert_eq!(editor.content_string(), "see: ![описание](/uploads/cat.png)");
        assert_eq!(client.sent.borrow()[0].bytes, vec![1, 2, 3]);
    }

    struct EchoRenderer;

    impl RenderClient for EchoRenderer {
        async fn render(&self, content: &str) -> Result<String, EditorError> {
            Ok(format!("<p>{content}</p>"))
        }
    }

    #[tokio::test]
    async fn test_render_client_fake() {
        assert_eq!(EchoRenderer.render("x").await.unwrap(), "<p>x</p>");
    }
}
