use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::publish::PublishError;
use crate::settings::ForumSettings;

/// Operator credentials for the forum's API.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub user_agent: String,
}

impl Credentials {
    fn is_complete(&self) -> bool {
        !(self.client_id.is_empty()
            || self.client_secret.is_empty()
            || self.refresh_token.is_empty()
            || self.user_agent.is_empty())
    }
}

/// Loads the credentials file. A missing file gets a template written in its
/// place and yields `None`, as does a file with unfilled fields; the operator
/// must complete it out-of-band and re-run. Neither case is a failure.
pub fn load_or_init(path: &Path) -> anyhow::Result<Option<Credentials>> {
    if !path.exists() {
        let template = serde_json::to_string_pretty(&Credentials::default())?;
        fs::write(path, template)
            .with_context(|| format!("write credentials template {}", path.display()))?;
        info!(path = %path.display(), "wrote credentials template");
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("read credentials {}", path.display()))?;
    let credentials: Credentials = serde_json::from_str(&text)
        .with_context(|| format!("parse credentials {}", path.display()))?;
    Ok(credentials.is_complete().then_some(credentials))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges the refresh token for a bearer token.
pub fn access_token(
    http: &reqwest::blocking::Client,
    forum: &ForumSettings,
    credentials: &Credentials,
) -> Result<String, PublishError> {
    let stage = "token exchange";
    let response = http
        .post(format!("{}/api/v1/access_token", forum.auth_url))
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .header(reqwest::header::USER_AGENT, &credentials.user_agent)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", credentials.refresh_token.as_str()),
        ])
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|source| PublishError::Http { stage, source })?;
    let token: TokenResponse = response
        .json()
        .map_err(|source| PublishError::Http { stage, source })?;
    Ok(token.access_token)
}
