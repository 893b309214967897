use std::fmt::Write as _;

use crate::compose::SheetLayout;

/// How emitted rules reference a sheet image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssRefStyle {
    /// `url(<sheet>.png)`, for previewing against the local output directory.
    Relative,
    /// `url(%%<sheet>%%)`, the forum's hosted-image namespace.
    Forum,
}

impl CssRefStyle {
    fn url(self, sheet: &str) -> String {
        match self {
            CssRefStyle::Relative => format!("url({sheet}.png)"),
            CssRefStyle::Forum => format!("url(%%{sheet}%%)"),
        }
    }
}

/// A CSS rule as structured data: a selector list plus declarations,
/// serialized only at the end. Keeps selector escaping in one place instead
/// of scattered through format strings.
#[derive(Debug, Clone, Default)]
pub struct Rule {
    selectors: Vec<String>,
    declarations: Vec<(String, String)>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    pub fn declaration(mut self, property: &str, value: impl Into<String>) -> Self {
        self.declarations.push((property.into(), value.into()));
        self
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    fn render(&self, out: &mut String) {
        out.push_str(&self.selectors.join(", "));
        out.push_str(" {");
        for (property, value) in &self.declarations {
            let _ = write!(out, " {property}: {value};");
        }
        out.push_str(" }\n");
    }
}

/// Accumulating stylesheet buffer; rules go in bucket-then-member order and
/// come out verbatim.
#[derive(Debug, Default)]
pub struct Stylesheet {
    rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) {
        self.rules.extend(rules);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            rule.render(&mut out);
        }
        out
    }
}

/// Escapes a string for use inside a double-quoted CSS string literal.
pub fn escape_css_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Selector matching the forum's rendered emote link for `name`.
pub fn emote_selector(name: &str) -> String {
    format!("a[href=\"/{}\"]", escape_css_string(name))
}

/// Rules for one sheet: a shared background-image rule binding every member
/// selector, then either the raw-mode fixed-size rule or one positioning
/// rule per member. Members not flagged `text` get their link text hidden.
pub fn sheet_rules(layout: &SheetLayout, style: CssRefStyle) -> Vec<Rule> {
    let mut rules = Vec::with_capacity(layout.placements.len() + 1);

    let mut shared = Rule::new();
    for p in &layout.placements {
        shared = shared.selector(emote_selector(&p.key));
    }
    rules.push(shared.declaration("background-image", style.url(&layout.name)));

    if layout.raw {
        if let Some(p) = layout.placements.first() {
            rules.push(
                Rule::new()
                    .selector(emote_selector(&p.key))
                    .declaration("display", "block")
                    .declaration("float", "left")
                    .declaration("width", format!("{}px", p.w))
                    .declaration("height", format!("{}px", p.h)),
            );
        }
    } else {
        for p in &layout.placements {
            let mut rule = Rule::new()
                .selector(emote_selector(&p.key))
                .declaration("background-position", format!("0 -{}px", p.y))
                .declaration("width", format!("{}px", p.w))
                .declaration("height", format!("{}px", p.h));
            if !p.text {
                rule = rule.declaration("font-size", "0");
            }
            rules.push(rule);
        }
    }
    rules
}
