use tracing::{info, instrument};

use crate::compose::{SheetOutput, compose_bucket};
use crate::config::SheetConfig;
use crate::css::{CssRefStyle, Stylesheet, sheet_rules};
use crate::error::{Result, SheetError};
use crate::group::{GroupRules, InputImage, group_inputs};

/// Output of a build pass: one composed sheet per bucket plus the rendered
/// stylesheet text.
#[derive(Debug)]
pub struct BuildOutput {
    pub sheets: Vec<SheetOutput>,
    pub css: String,
}

/// Runs the whole pass: resolve configs, group, compose each bucket, emit
/// the stylesheet.
///
/// Inputs are sorted by key first, so the output is deterministic regardless
/// of how the filesystem enumeration ordered the files.
#[instrument(skip_all)]
pub fn build_sheets(
    mut inputs: Vec<InputImage>,
    cfg: &SheetConfig,
    rules: &GroupRules,
    style: CssRefStyle,
) -> Result<BuildOutput> {
    cfg.validate()?;
    if inputs.is_empty() {
        return Err(SheetError::Empty);
    }
    inputs.sort_by(|a, b| a.key.cmp(&b.key));

    let buckets = group_inputs(inputs, cfg, rules)?;
    let mut sheets = Vec::with_capacity(buckets.len());
    let mut stylesheet = Stylesheet::default();
    for bucket in &buckets {
        let output = compose_bucket(bucket)?;
        stylesheet.extend(sheet_rules(&output.layout, style));
        sheets.push(output);
    }
    info!(sheets = sheets.len(), "composed sprite sheets");
    Ok(BuildOutput {
        sheets,
        css: stylesheet.render(),
    })
}
