use globset::{Glob, GlobMatcher};
use image::DynamicImage;

use crate::config::{GroupPatch, GroupRule, ImageConfig, SheetConfig};
use crate::error::Result;

/// In-memory image to place on a sheet (key + decoded image).
///
/// The key is the base filename with its extension stripped; it doubles as
/// the CSS selector name and the subject group patterns are matched against.
pub struct InputImage {
    pub key: String,
    pub image: DynamicImage,
}

/// A bucket member: the input image plus its resolved config.
pub struct Member {
    pub key: String,
    pub image: DynamicImage,
    pub config: ImageConfig,
}

/// A named output unit. One generated sheet image and CSS fragment per
/// bucket; members are kept in input order, which fixes the stacking order.
pub struct Bucket {
    pub name: String,
    pub members: Vec<Member>,
}

/// Group patterns compiled in declaration order.
#[derive(Debug)]
pub struct GroupRules {
    rules: Vec<(GlobMatcher, GroupPatch)>,
}

impl GroupRules {
    pub fn compile(rules: &[GroupRule]) -> Result<Self> {
        let mut out = Vec::with_capacity(rules.len());
        for r in rules {
            out.push((Glob::new(&r.pattern)?.compile_matcher(), r.patch.clone()));
        }
        Ok(Self { rules: out })
    }

    /// First rule whose pattern matches `key`, in declaration order.
    pub fn first_match(&self, key: &str) -> Option<&GroupPatch> {
        self.rules
            .iter()
            .find(|(matcher, _)| matcher.is_match(key))
            .map(|(_, patch)| patch)
    }
}

/// Partitions inputs into buckets. Every input lands in exactly one bucket:
/// the one named by its first matching rule, or the default bucket with the
/// unmodified globals. Buckets appear in order of first use.
pub fn group_inputs(
    inputs: Vec<InputImage>,
    cfg: &SheetConfig,
    rules: &GroupRules,
) -> Result<Vec<Bucket>> {
    let mut buckets: Vec<Bucket> = Vec::new();
    for input in inputs {
        let config = cfg.resolve(rules.first_match(&input.key))?;
        let idx = match buckets.iter().position(|b| b.name == config.sheet) {
            Some(i) => i,
            None => {
                buckets.push(Bucket {
                    name: config.sheet.clone(),
                    members: Vec::new(),
                });
                buckets.len() - 1
            }
        };
        buckets[idx].members.push(Member {
            key: input.key,
            image: input.image,
            config,
        });
    }
    Ok(buckets)
}
