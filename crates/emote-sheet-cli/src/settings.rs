use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use emote_sheet_core::{GroupRule, SheetConfig};
use serde::Deserialize;

/// The run's configuration document (`config.json` by default).
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Glob for the source emote images.
    pub images: String,
    /// Optional glob for extra raw CSS fragment files, concatenated ahead of
    /// the generated rules.
    #[serde(default)]
    pub css: Option<String>,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Global sheet defaults (`sheet_name`, `max_height`, `margin`).
    #[serde(flatten)]
    pub sheet: SheetConfig,
    /// Ordered group rules; first match in this order wins.
    #[serde(default)]
    pub groups: Vec<GroupRule>,
    /// CSS minifier argv; `{in}` and `{out}` are substituted.
    #[serde(default = "default_css_minifier")]
    pub css_minifier: Vec<String>,
    /// PNG optimizer argv; `{in}` is substituted.
    #[serde(default = "default_png_optimizer")]
    pub png_optimizer: Vec<String>,
    #[serde(default = "default_credentials_path")]
    pub credentials: PathBuf,
    /// Publishing target; `publish` refuses to run without it.
    #[serde(default)]
    pub forum: Option<ForumSettings>,
}

#[derive(Debug, Deserialize)]
pub struct ForumSettings {
    /// Authenticated API endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Token-exchange endpoint.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Forum section whose stylesheet and images we manage.
    pub section: String,
    #[serde(default = "default_post_title")]
    pub post_title: String,
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(settings)
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_css_minifier() -> Vec<String> {
    ["cleancss", "-o", "{out}", "{in}"]
        .map(String::from)
        .to_vec()
}

fn default_png_optimizer() -> Vec<String> {
    ["optipng", "-quiet", "{in}"].map(String::from).to_vec()
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_api_url() -> String {
    "https://oauth.reddit.com".into()
}

fn default_auth_url() -> String {
    "https://www.reddit.com".into()
}

fn default_post_title() -> String {
    "Emote sheet update".into()
}
