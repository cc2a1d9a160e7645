use expect_test::expect;
use futures::executor::block_on;
use lattice_source::ModulePath;

use crate::common::{memory_resolver, order};

#[test]
fn test_document_without_imports_is_unchanged() {
    const SOURCE: &str = "/* base */\n.a{color:red}\n@media print{.a{color : black ;}}\n";
    let (fetcher, resolver) = memory_resolver(&[("/a.css", SOURCE)]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(resolution.source, SOURCE);
    assert!(resolution.exports.is_empty());
    assert!(resolution.is_complete());
    assert_eq!(order(&resolution), vec!["/a.css"]);
    assert_eq!(fetcher.total_fetches(), 1);
}

#[test]
fn test_imported_value_replaces_local_name() {
    let (_, resolver) = memory_resolver(&[
        ("/a.css", r#":import("./b.css") { localB: exportedB; } .x { color: localB; }"#),
        ("/b.css", ":export { exportedB: red; }"),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(resolution.source, ".x { color: red; }");
    assert_eq!(order(&resolution), vec!["/b.css", "/a.css"]);
}

#[test]
fn test_linear_chain_emits_deepest_first() {
    let (_, resolver) = memory_resolver(&[
        ("/a.css", ":import(\"./b.css\") {}\n.a { order: 3; }\n"),
        ("/b.css", ":import(\"./c.css\") {}\n.b { order: 2; }\n"),
        ("/c.css", ".c { order: 1; }\n"),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(order(&resolution), vec!["/c.css", "/b.css", "/a.css"]);
    expect![[r#"
        .c { order: 1; }
        .b { order: 2; }
        .a { order: 3; }
    "#]]
    .assert_eq(&resolution.source);
}

#[test]
fn test_diamond_loads_shared_module_once() {
    let (fetcher, resolver) = memory_resolver(&[
        ("/a.css", ":import(\"./b.css\") {}\n:import(\"./c.css\") {}\n.a { display: block; }\n"),
        ("/b.css", ":import(\"./d.css\") { x: x; }\n.b { color: x; }\n"),
        ("/c.css", ":import(\"./d.css\") { x: x; }\n.c { background: x; }\n"),
        ("/d.css", ".d { margin: 0; }\n:export { x: red; }\n"),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(fetcher.fetch_count("/d.css"), 1);
    assert_eq!(order(&resolution), vec!["/d.css", "/b.css", "/c.css", "/a.css"]);
    expect![[r#"
        .d { margin: 0; }
        .b { color: red; }
        .c { background: red; }
        .a { display: block; }
    "#]]
    .assert_eq(&resolution.source);
}

#[test]
fn test_shared_dependency_emitted_at_first_reach() {
    // a -> b -> e, a -> c -> (e, f)
    let (fetcher, resolver) = memory_resolver(&[
        ("/a.css", r#":import("./b.css") {} :import("./c.css") {} .a {}"#),
        ("/b.css", r#":import("./e.css") {} .b {}"#),
        ("/c.css", r#":import("./e.css") {} :import("./f.css") {} .c {}"#),
        ("/e.css", ".e {}"),
        ("/f.css", ".f {}"),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(fetcher.fetch_count("/e.css"), 1);
    assert_eq!(order(&resolution), vec!["/e.css", "/b.css", "/f.css", "/c.css", "/a.css"]);
}

#[test]
fn test_different_specifiers_share_one_module() {
    let (fetcher, resolver) = memory_resolver(&[
        (
            "/app.css",
            concat!(
                ":import(\"./theme/colors.css\") { brand: primary; }\n",
                ":import(\"./components/button.css\") { buttonColor: buttonColor; }\n",
                "\n",
                ".app {\n  color: brand;\n  border-color: buttonColor;\n}\n",
            ),
        ),
        ("/theme/colors.css", ":export { primary: #0055ff; }\n"),
        (
            "/components/button.css",
            concat!(
                ":import(\"../theme/colors.css\") { primary: primary; }\n",
                ".button {\n  color: primary;\n}\n",
                ":export { buttonColor: primary; }\n",
            ),
        ),
    ]);
    let resolution = block_on(resolver.resolve_entry("app.css")).unwrap();

    assert_eq!(fetcher.fetch_count("/theme/colors.css"), 1);
    assert!(resolution.is_complete());
    // colors.css is export-only and leaves just its final newline
    assert_eq!(
        resolution.source,
        "\n.button {\n  color: #0055ff;\n}\n.app {\n  color: #0055ff;\n  border-color: #0055ff;\n}\n"
    );
}

#[test]
fn test_reexport_propagates_through_chain() {
    let (_, resolver) = memory_resolver(&[
        ("/a.css", r#":import("./b.css") { y: y; } .a { color: y; }"#),
        ("/b.css", r#":import("./d.css") { localX: x; } :export { y: localX; }"#),
        ("/d.css", ":export { x: red; }"),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(resolution.source, ".a { color: red; }");
}

#[test]
fn test_later_import_wins_for_same_local_name() {
    let (_, resolver) = memory_resolver(&[
        ("/a.css", r#":import("./b.css") { tone: v; } :import("./c.css") { tone: v; } .a { color: tone; }"#),
        ("/b.css", ":export { v: red; }"),
        ("/c.css", ":export { v: blue; }"),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(resolution.source, ".a { color: blue; }");
}

#[test]
fn test_entry_exports_are_translated() {
    let (_, resolver) = memory_resolver(&[
        ("/a.css", r#":import("./b.css") { p: primary; } :export { brand: p; border: 1px solid p; }"#),
        ("/b.css", ":export { primary: #00f; }"),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    let exports: Vec<(&str, &str)> = resolution
        .exports
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(exports, vec![("brand", "#00f"), ("border", "1px solid #00f")]);
    assert_eq!(resolution.source, "");
    expect![[r#"
        :export {
          brand: #00f;
          border: 1px solid #00f;
        }
    "#]]
    .assert_eq(&resolution.exports_block());
}

#[test]
fn test_media_parameters_are_substituted() {
    let (_, resolver) = memory_resolver(&[
        ("/a.css", r#":import("./media.css") { small: small; } @media small { .a { margin: 0; } }"#),
        ("/media.css", ":export { small: (max-width: 599px); }"),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(resolution.source, "@media (max-width: 599px) { .a { margin: 0; } }");
}

#[test]
fn test_resolve_source_uses_given_path() {
    let (_, resolver) = memory_resolver(&[("/lib/b.css", ":export { gap: 4px; }")]);
    let entry = ModulePath::new("/lib/a.css");
    let resolution = block_on(resolver.resolve_source(entry, r#":import("./b.css") { gap: gap; } .a { padding: gap; }"#)).unwrap();

    assert_eq!(resolution.source, ".a { padding: 4px; }");
    assert_eq!(order(&resolution), vec!["/lib/b.css", "/lib/a.css"]);
}

#[test]
fn test_each_resolution_starts_fresh() {
    let (fetcher, resolver) = memory_resolver(&[
        ("/a.css", r#":import("./b.css") {} .a {}"#),
        ("/b.css", ".b {}"),
    ]);
    let first = block_on(resolver.resolve_entry("a.css")).unwrap();
    let second = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(first.source, second.source);
    assert_eq!(fetcher.fetch_count("/b.css"), 2);
}

#[test]
fn test_imported_module_with_comments() {
    let (_, resolver) = memory_resolver(&[
        ("/a.css", ":import(\"./b.css\") { brand: primary; } /* from b */\n.a { color: brand; }\n"),
        (
            "/b.css",
            "/* palette */\n.swatch { color: teal; } /* teal */\n:export {\n  /* brand */\n  primary: teal;\n}\n",
        ),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert!(resolution.is_complete());
    assert_eq!(order(&resolution), vec!["/b.css", "/a.css"]);
    expect![[r#"
        /* palette */
        .swatch { color: teal; }
        .a { color: teal; }
    "#]]
    .assert_eq(&resolution.source);
}

#[test]
fn test_semicolon_inside_url_does_not_split_declaration() {
    let (_, resolver) = memory_resolver(&[
        ("/a.css", ":import(\"./b.css\") { c: c; }\n.a { color: c; }\n"),
        (
            "/b.css",
            ".icon { background: url(data:image/svg+xml;charset=utf8,%3Csvg%3E); }\n:export { c: red; }\n",
        ),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert!(resolution.is_complete());
    assert_eq!(resolution.exports.len(), 0);
    assert_eq!(
        resolution.source,
        ".icon { background: url(data:image/svg+xml;charset=utf8,%3Csvg%3E); }\n.a { color: red; }\n"
    );
}
