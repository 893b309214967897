use emote_sheet_core::prelude::*;

fn css_for(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("a[href=\"/{n}\"] {{ width: 10px; }}\n"))
        .collect()
}

#[test]
fn diff_is_symmetric_difference() {
    let old = css_for(&["gone", "kept"]);
    let new = css_for(&["kept", "fresh"]);
    assert_eq!(diff(&old, &new), "+fresh -gone");
}

#[test]
fn diff_is_empty_iff_sets_match() {
    let old = css_for(&["a", "b"]);
    // Duplicate selectors and different rule bodies do not matter.
    let new = format!("{}{}", css_for(&["b", "a"]), css_for(&["a"]));
    assert_eq!(diff(&old, &new), "");
    assert_ne!(diff(&old, &css_for(&["a"])), "");
}

#[test]
fn entries_are_sorted_lexicographically() {
    let old = css_for(&["zeta", "mid"]);
    let new = css_for(&["alpha", "mid", "beta"]);
    // '+' sorts before '-', so additions come first here.
    assert_eq!(diff(&old, &new), "+alpha +beta -zeta");
}

#[test]
fn quotes_inside_declaration_blocks_are_ignored() {
    let css = r#"a[href="/real"] { content: "not-a-name"; background: url("x.png"); }"#;
    let names = selector_names(css);
    assert_eq!(names.len(), 1);
    assert!(names.contains("real"));
}

#[test]
fn comments_and_escapes_are_handled() {
    let css = r#"
/* a[href="/commented"] { } */
a[href="/kept"] { width: 1px; }
a[href="/es\"caped"] { width: 1px; }
"#;
    let names = selector_names(css);
    assert!(!names.contains("commented"));
    assert!(names.contains("kept"));
    assert!(names.contains("es\"caped"));
}

#[test]
fn leading_slash_is_stripped() {
    let names = selector_names("a[href=\"/wave\"] { }");
    assert!(names.contains("wave"));
    assert!(!names.contains("/wave"));
}
