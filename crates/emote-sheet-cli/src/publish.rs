use std::path::Path;

use reqwest::blocking::{Client, Response, multipart};
use reqwest::header;
use thiserror::Error;
use tracing::info;

use crate::settings::ForumSettings;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("{stage} failed: {source}")]
    Http {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{stage} rejected by the forum: {message}")]
    Rejected { stage: &'static str, message: String },
    #[error("{stage} failed: {source}")]
    Io {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Authenticated client for the forum's styling and posting APIs. All calls
/// are synchronous; any rejection aborts the run and leaves the local build
/// artifacts in place for a manual retry.
pub struct ForumClient {
    http: Client,
    api_url: String,
    section: String,
    token: String,
    user_agent: String,
}

impl ForumClient {
    pub fn new(http: Client, forum: &ForumSettings, token: String, user_agent: String) -> Self {
        Self {
            http,
            api_url: forum.api_url.clone(),
            section: forum.section.clone(),
            token,
            user_agent,
        }
    }

    fn send(
        &self,
        stage: &'static str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<Response, PublishError> {
        request
            .bearer_auth(&self.token)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .and_then(Response::error_for_status)
            .map_err(|source| PublishError::Http { stage, source })
    }

    /// The forum's API wraps write responses in `{"json": {"errors": [...]}}`.
    fn check_api_errors(
        stage: &'static str,
        response: Response,
    ) -> Result<(), PublishError> {
        let body: serde_json::Value = response
            .json()
            .map_err(|source| PublishError::Http { stage, source })?;
        let errors = body
            .pointer("/json/errors")
            .and_then(serde_json::Value::as_array);
        match errors {
            Some(errors) if !errors.is_empty() => Err(PublishError::Rejected {
                stage,
                message: serde_json::Value::Array(errors.clone()).to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Fetches the currently published stylesheet text.
    pub fn fetch_stylesheet(&self) -> Result<String, PublishError> {
        let stage = "stylesheet fetch";
        let url = format!(
            "{}/r/{}/about/stylesheet.json",
            self.api_url, self.section
        );
        let response = self.send(stage, self.http.get(url))?;
        let body: serde_json::Value = response
            .json()
            .map_err(|source| PublishError::Http { stage, source })?;
        Ok(body
            .pointer("/data/stylesheet")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Uploads one sheet image under `name`.
    pub fn upload_image(&self, name: &str, path: &Path) -> Result<(), PublishError> {
        let stage = "image upload";
        let form = multipart::Form::new()
            .text("name", name.to_string())
            .text("upload_type", "img")
            .text("img_type", "png")
            .text("header", "0")
            .file("file", path)
            .map_err(|source| PublishError::Io { stage, source })?;
        let url = format!("{}/r/{}/api/upload_sr_img", self.api_url, self.section);
        let response = self.send(stage, self.http.post(url).multipart(form))?;
        info!(name, "uploaded sheet image");
        Self::check_api_errors(stage, response)
    }

    /// Replaces the published stylesheet, recording `reason` as the change
    /// description.
    pub fn update_stylesheet(&self, css: &str, reason: &str) -> Result<(), PublishError> {
        let stage = "stylesheet update";
        let url = format!(
            "{}/r/{}/api/subreddit_stylesheet",
            self.api_url, self.section
        );
        let response = self.send(
            stage,
            self.http.post(url).form(&[
                ("api_type", "json"),
                ("op", "save"),
                ("stylesheet_contents", css),
                ("reason", reason),
            ]),
        )?;
        info!(reason, "updated published stylesheet");
        Self::check_api_errors(stage, response)
    }

    /// Creates a text post listing the published emotes.
    pub fn submit_post(&self, title: &str, body: &str) -> Result<(), PublishError> {
        let stage = "post submit";
        let url = format!("{}/api/submit", self.api_url);
        let response = self.send(
            stage,
            self.http.post(url).form(&[
                ("api_type", "json"),
                ("sr", self.section.as_str()),
                ("kind", "self"),
                ("title", title),
                ("text", body),
            ]),
        )?;
        info!(title, "submitted post");
        Self::check_api_errors(stage, response)
    }
}
