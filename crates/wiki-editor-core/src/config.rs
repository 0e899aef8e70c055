//! Page configuration.
//!
//! Every field has a default matching the stock wiki templates, so a page
//! only has to spell out what it changes. Keys are camelCase on the wire.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actions::HeadingLevels;
use crate::annotate::CopyLabels;
use crate::client::endpoint_url;
use crate::debounce::Debouncer;
use crate::error::EditorError;
use crate::preview::{PreviewMachine, PreviewMode};
use crate::upload::UploadSettings;

/// Ids of the elements the editor binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub textarea: String,
    pub toolbar: String,
    pub preview: String,
    /// Auto-preview checkbox. Pages without one always auto-render.
    pub auto_checkbox: Option<String>,
    pub refresh_button: Option<String>,
    /// Hidden container revealed by the first manual refresh.
    pub preview_container: Option<String>,
    pub upload_button: Option<String>,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            textarea: "content".into(),
            toolbar: "editor-toolbar".into(),
            preview: "preview".into(),
            auto_checkbox: Some("auto-preview".into()),
            refresh_button: Some("refresh-preview".into()),
            preview_container: None,
            upload_button: Some("upload-button".into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewModeSetting {
    #[default]
    Auto,
    Manual,
}

impl From<PreviewModeSetting> for PreviewMode {
    fn from(setting: PreviewModeSetting) -> Self {
        match setting {
            PreviewModeSetting::Auto => PreviewMode::Auto,
            PreviewModeSetting::Manual => PreviewMode::Manual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewSettings {
    pub mode: PreviewModeSetting,
    pub debounce_ms: u32,
    /// Fragment shown in place of the preview when rendering fails.
    pub error_html: String,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            mode: PreviewModeSetting::Auto,
            debounce_ms: 300,
            error_html: r#"<p class="text-red-600">Ошибка предпросмотра</p>"#.into(),
        }
    }
}

impl PreviewSettings {
    /// A preview machine for these settings.
    pub fn machine(&self, auto_enabled: bool) -> PreviewMachine {
        PreviewMachine::new(
            self.mode.into(),
            auto_enabled,
            Debouncer::new(Duration::from_millis(u64::from(self.debounce_ms))),
            self.error_html.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Origin the endpoints are resolved against. `None` uses the page origin.
    pub base_url: Option<String>,
    pub render_endpoint: String,
    pub upload_endpoint: String,
    pub elements: ElementIds,
    pub preview: PreviewSettings,
    pub headings: HeadingLevels,
    pub code_copy: CopyLabels,
    pub copy_target: CopyLabels,
    pub upload: UploadSettings,
    pub unsaved_message: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            render_endpoint: "/render_markdown".into(),
            upload_endpoint: "/upload".into(),
            elements: ElementIds::default(),
            preview: PreviewSettings::default(),
            headings: HeadingLevels::default(),
            code_copy: CopyLabels::default(),
            copy_target: CopyLabels::for_copy_targets(),
            upload: UploadSettings::default(),
            unsaved_message: "Есть несохраненные изменения. Перейти без сохранения?".into(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config, filling gaps with defaults.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let json = json.trim();
        if json.is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_json::from_str(json)?;
        config.headings = config.headings.normalized();
        Ok(config)
    }

    /// Base URL to use, falling back to `page_origin`.
    pub fn base_url_or<'a>(&'a self, page_origin: &'a str) -> &'a str {
        self.base_url
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(page_origin)
    }

    pub fn render_url(&self, page_origin: &str) -> String {
        endpoint_url(self.base_url_or(page_origin), &self.render_endpoint)
    }

    pub fn upload_url(&self, page_origin: &str) -> String {
        endpoint_url(self.base_url_or(page_origin), &self.upload_endpoint)
    }
}
