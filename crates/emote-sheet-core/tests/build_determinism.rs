use emote_sheet_core::prelude::*;
use image::{DynamicImage, Rgba, RgbaImage};

fn input(key: &str, w: u32, h: u32, shade: u8) -> InputImage {
    InputImage {
        key: key.into(),
        image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            w,
            h,
            Rgba([shade, shade, shade, 255]),
        )),
    }
}

fn inputs() -> Vec<InputImage> {
    vec![
        input("wave", 40, 40, 10),
        input("cat_nod", 64, 120, 20),
        input("shrug", 32, 16, 30),
        input("cat_wave", 50, 50, 40),
    ]
}

fn config() -> (SheetConfig, Vec<GroupRule>) {
    let cfg = SheetConfig {
        sheet_name: "main".into(),
        max_height: Some(80),
        margin: Some(6),
    };
    let rules = vec![GroupRule {
        pattern: "cat*".into(),
        patch: GroupPatch {
            sheet: Some("cats".into()),
            ..Default::default()
        },
    }];
    (cfg, rules)
}

#[test]
fn identical_runs_produce_identical_output() {
    let (cfg, group_rules) = config();
    let rules = GroupRules::compile(&group_rules).expect("rules");
    let first = build_sheets(inputs(), &cfg, &rules, CssRefStyle::Forum).expect("first run");
    let second = build_sheets(inputs(), &cfg, &rules, CssRefStyle::Forum).expect("second run");

    assert_eq!(first.css, second.css);
    assert_eq!(first.sheets.len(), second.sheets.len());
    for (a, b) in first.sheets.iter().zip(&second.sheets) {
        assert_eq!(a.layout.name, b.layout.name);
        let pa = a.rgba.as_ref().expect("pixels");
        let pb = b.rgba.as_ref().expect("pixels");
        assert_eq!(pa.as_raw(), pb.as_raw());
    }
}

#[test]
fn enumeration_order_does_not_matter() {
    let (cfg, group_rules) = config();
    let rules = GroupRules::compile(&group_rules).expect("rules");
    let forward = build_sheets(inputs(), &cfg, &rules, CssRefStyle::Forum).expect("forward");
    let mut reversed = inputs();
    reversed.reverse();
    let backward = build_sheets(reversed, &cfg, &rules, CssRefStyle::Forum).expect("backward");
    assert_eq!(forward.css, backward.css);
    for (a, b) in forward.sheets.iter().zip(&backward.sheets) {
        assert_eq!(
            a.rgba.as_ref().map(RgbaImage::as_raw),
            b.rgba.as_ref().map(RgbaImage::as_raw)
        );
    }
}

#[test]
fn empty_input_set_is_an_error() {
    let (cfg, group_rules) = config();
    let rules = GroupRules::compile(&group_rules).expect("rules");
    let err = build_sheets(Vec::new(), &cfg, &rules, CssRefStyle::Forum).expect_err("empty");
    assert!(matches!(err, SheetError::Empty));
}

#[test]
fn stylesheet_lists_buckets_then_members() {
    let (cfg, group_rules) = config();
    let rules = GroupRules::compile(&group_rules).expect("rules");
    let out = build_sheets(inputs(), &cfg, &rules, CssRefStyle::Forum).expect("build");
    // Keys sort as cat_nod, cat_wave, shrug, wave; "cats" is used first.
    assert_eq!(out.sheets[0].layout.name, "cats");
    assert_eq!(out.sheets[1].layout.name, "main");
    let cats = out.css.find("url(%%cats%%)").expect("cats sheet rule");
    let main = out.css.find("url(%%main%%)").expect("main sheet rule");
    assert!(cats < main);
}
