use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// Global sheet defaults, applied to every image unless a matching group
/// patch overrides them.
///
/// `max_height` and `margin` are optional here so that they may be supplied
/// per group instead; an image whose resolved config is missing either key is
/// a `MissingConfig` error at resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Name of the default bucket for images no group pattern matches.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// Maximum member height in pixels; taller images are downscaled.
    #[serde(default)]
    pub max_height: Option<u32>,
    /// Vertical gap in pixels below each member on the sheet.
    #[serde(default)]
    pub margin: Option<u32>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            sheet_name: default_sheet_name(),
            max_height: None,
            margin: None,
        }
    }
}

fn default_sheet_name() -> String {
    "emotes".into()
}

/// Per-group override patch. Unset fields fall through to the globals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupPatch {
    /// Alternate bucket name for matching images.
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub max_height: Option<u32>,
    #[serde(default)]
    pub margin: Option<u32>,
    /// Copy the single source image through unchanged instead of compositing.
    #[serde(default)]
    pub raw: Option<bool>,
    /// Keep the link text visible instead of hiding it under the sprite.
    #[serde(default)]
    pub text: Option<bool>,
}

/// A glob pattern plus the patch applied to images it matches.
///
/// Rules are an ordered list and matching is first-match-wins in declaration
/// order, so the tie-break between overlapping patterns is explicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRule {
    pub pattern: String,
    #[serde(flatten)]
    pub patch: GroupPatch,
}

/// Fully resolved per-image settings. Immutable after the merge; one value
/// per input image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub sheet: String,
    pub max_height: u32,
    pub margin: u32,
    pub raw: bool,
    pub text: bool,
}

impl SheetConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_height == Some(0) {
            return Err(SheetError::InvalidConfig(
                "max_height must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Pure merge: patch keys win over the globals, nothing is mutated.
    /// A required key present in neither is a `MissingConfig` error.
    pub fn resolve(&self, patch: Option<&GroupPatch>) -> Result<ImageConfig> {
        let max_height = patch
            .and_then(|p| p.max_height)
            .or(self.max_height)
            .ok_or(SheetError::MissingConfig { key: "max_height" })?;
        if max_height == 0 {
            return Err(SheetError::InvalidConfig(
                "max_height must be positive".into(),
            ));
        }
        let margin = patch
            .and_then(|p| p.margin)
            .or(self.margin)
            .ok_or(SheetError::MissingConfig { key: "margin" })?;
        let sheet = patch
            .and_then(|p| p.sheet.clone())
            .unwrap_or_else(|| self.sheet_name.clone());
        Ok(ImageConfig {
            sheet,
            max_height,
            margin,
            raw: patch.and_then(|p| p.raw).unwrap_or(false),
            text: patch.and_then(|p| p.text).unwrap_or(false),
        })
    }
}
