//! Core library for assembling emote images into CSS sprite sheets.
//!
//! - Grouping: glob patterns partition inputs into named buckets (first match
//!   in declaration order wins; the rest land in a default bucket).
//! - Composition: each bucket is stacked into a single vertical column, with
//!   over-tall members downscaled; raw buckets pass the source file through.
//! - Emission: one structured CSS rule set per sheet, plus a change-set diff
//!   between two stylesheet generations.
//!
//! Quick example:
//! ```ignore
//! use emote_sheet_core::{CssRefStyle, GroupRules, InputImage, SheetConfig, build_sheets};
//! # fn main() -> anyhow::Result<()> {
//! let img = image::ImageReader::open("wave.png")?.decode()?;
//! let inputs = vec![InputImage { key: "wave".into(), image: img }];
//! let cfg = SheetConfig { max_height: Some(100), margin: Some(10), ..Default::default() };
//! let rules = GroupRules::compile(&[])?;
//! let out = build_sheets(inputs, &cfg, &rules, CssRefStyle::Forum)?;
//! println!("{}", out.css);
//! # Ok(()) }
//! ```

pub mod compose;
pub mod config;
pub mod css;
pub mod diff;
pub mod error;
pub mod group;
pub mod pipeline;

pub use compose::*;
pub use config::*;
pub use css::*;
pub use diff::*;
pub use error::*;
pub use group::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
pub mod prelude {
    pub use crate::compose::{Placement, SheetLayout, SheetOutput, compose_bucket, scaled_width};
    pub use crate::config::{GroupPatch, GroupRule, ImageConfig, SheetConfig};
    pub use crate::css::{
        CssRefStyle, Rule, Stylesheet, emote_selector, escape_css_string, sheet_rules,
    };
    pub use crate::diff::{diff, selector_names};
    pub use crate::group::{Bucket, GroupRules, InputImage, group_inputs};
    pub use crate::pipeline::{BuildOutput, build_sheets};
    pub use crate::{Result, SheetError};
}
