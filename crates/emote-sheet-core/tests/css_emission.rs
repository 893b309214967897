use emote_sheet_core::prelude::*;

fn placement(key: &str, y: u32, w: u32, h: u32, text: bool) -> Placement {
    Placement {
        key: key.into(),
        y,
        w,
        h,
        source_size: (w, h),
        resized: false,
        text,
    }
}

fn column_layout() -> SheetLayout {
    SheetLayout {
        name: "emotes".into(),
        width: 100,
        height: 160,
        raw: false,
        placements: vec![
            placement("a", 0, 100, 50, false),
            placement("b", 60, 50, 100, false),
        ],
    }
}

#[test]
fn every_member_gets_exactly_one_position_rule() {
    let rules = sheet_rules(&column_layout(), CssRefStyle::Forum);
    // Shared rule plus one per member.
    assert_eq!(rules.len(), 3);
    for key in ["a", "b"] {
        let selector = emote_selector(key);
        let count = rules[1..]
            .iter()
            .filter(|r| r.selectors().len() == 1 && r.selectors()[0] == selector)
            .count();
        assert_eq!(count, 1, "one position rule for {key}");
    }
}

#[test]
fn shared_rule_binds_all_members_to_the_sheet() {
    let rules = sheet_rules(&column_layout(), CssRefStyle::Forum);
    let mut css = Stylesheet::default();
    css.extend(rules);
    let text = css.render();
    let shared = text.lines().next().expect("shared rule first");
    assert_eq!(
        shared,
        "a[href=\"/a\"], a[href=\"/b\"] { background-image: url(%%emotes%%); }"
    );
}

#[test]
fn position_rules_carry_offset_and_size() {
    let mut css = Stylesheet::default();
    css.extend(sheet_rules(&column_layout(), CssRefStyle::Forum));
    let text = css.render();
    assert!(text.contains(
        "a[href=\"/b\"] { background-position: 0 -60px; width: 50px; height: 100px; font-size: 0; }"
    ));
    assert!(text.contains("background-position: 0 -0px"));
}

#[test]
fn text_flag_keeps_link_text_visible() {
    let layout = SheetLayout {
        placements: vec![placement("label", 0, 40, 20, true)],
        ..column_layout()
    };
    let mut css = Stylesheet::default();
    css.extend(sheet_rules(&layout, CssRefStyle::Forum));
    let text = css.render();
    assert!(!text.contains("font-size"));
}

#[test]
fn relative_style_points_at_local_files() {
    let mut css = Stylesheet::default();
    css.extend(sheet_rules(&column_layout(), CssRefStyle::Relative));
    assert!(css.render().contains("url(emotes.png)"));
}

#[test]
fn raw_layout_emits_fixed_size_block_rule() {
    let layout = SheetLayout {
        name: "banner".into(),
        width: 300,
        height: 120,
        raw: true,
        placements: vec![placement("banner", 0, 300, 120, false)],
    };
    let mut css = Stylesheet::default();
    css.extend(sheet_rules(&layout, CssRefStyle::Forum));
    let text = css.render();
    assert!(text.contains(
        "a[href=\"/banner\"] { display: block; float: left; width: 300px; height: 120px; }"
    ));
    assert!(!text.contains("background-position"));
}

#[test]
fn raw_layout_without_placements_does_not_panic() {
    let layout = SheetLayout {
        name: "empty".into(),
        width: 0,
        height: 0,
        raw: true,
        placements: Vec::new(),
    };
    let rules = sheet_rules(&layout, CssRefStyle::Forum);
    // Only the (selector-less) shared rule; no fixed-size rule to emit.
    assert_eq!(rules.len(), 1);
}

#[test]
fn selector_names_are_escaped() {
    assert_eq!(escape_css_string(r#"odd"name"#), r#"odd\"name"#);
    assert_eq!(escape_css_string(r"back\slash"), r"back\\slash");
    assert_eq!(emote_selector("plain"), r#"a[href="/plain"]"#);
    assert_eq!(emote_selector(r#"q"t"#), r#"a[href="/q\"t"]"#);
}
