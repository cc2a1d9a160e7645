use expect_test::expect;
use futures::executor::block_on;
use lattice_resolve::ResolveError;
use lattice_source::{FetchError, ModulePath};
use lattice_syntax::SyntaxError;
use miette::Diagnostic;

use crate::common::{memory_resolver, order};

#[test]
fn test_unresolvable_import_keeps_directive_and_names() {
    let (_, resolver) = memory_resolver(&[(
        "/a.css",
        r#":import("./missing.css") { m: thing; } .a { color: m; }"#,
    )]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(resolution.source, r#":import("./missing.css") { m: thing; } .a { color: m; }"#);

    assert_eq!(resolution.errors.len(), 1);
    assert_eq!(
        resolution.errors[0],
        ResolveError::ImportFetchFailed {
            path: ModulePath::new("/missing.css"),
            importer: ModulePath::new("/a.css"),
            source: FetchError::NotFound {
                path: ModulePath::new("/missing.css"),
            },
        }
    );
}

#[test]
fn test_failed_import_does_not_stop_siblings() {
    let (_, resolver) = memory_resolver(&[
        (
            "/a.css",
            r#":import("./b.css") { y: y; } :import("./c.css") { x: x; } .a { color: x; background: y; }"#,
        ),
        ("/b.css", ".b { color red; }"),
        ("/c.css", ":export { x: blue; }"),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    expect![[r#":import("./b.css") { y: y; } .a { color: blue; background: y; }"#]].assert_eq(&resolution.source);
    assert_eq!(order(&resolution), vec!["/c.css", "/a.css"]);

    match &resolution.errors[..] {
        [ResolveError::ImportParseFailed { path, source, .. }] => {
            assert_eq!(path.as_str(), "/b.css");
            assert!(matches!(source, SyntaxError::MissingColon { .. }));
        }
        other => panic!("Expected one parse failure, got {:?}", other),
    }
}

#[test]
fn test_failure_deep_in_tree_is_collected() {
    let (_, resolver) = memory_resolver(&[
        ("/a.css", r#":import("./b.css") { v: v; } .a { color: v; }"#),
        ("/b.css", r#":import("./gone.css") { w: w; } :export { v: w; }"#),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    // b still loads; its export carries the unresolved name through
    assert_eq!(resolution.source, ":import(\"./gone.css\") { w: w; }.a { color: w; }");
    assert_eq!(resolution.errors.len(), 1);
    assert_eq!(resolution.errors[0].path().map(|p| p.as_str()), Some("/gone.css"));
}

#[test]
fn test_failed_module_is_retried_by_later_import() {
    let (fetcher, resolver) = memory_resolver(&[(
        "/a.css",
        r#":import("./missing.css") {} :import("./missing.css") {} .a {}"#,
    )]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(fetcher.fetch_count("/missing.css"), 2);
    assert_eq!(resolution.errors.len(), 2);
    assert_eq!(order(&resolution), vec!["/a.css"]);
}

#[test]
fn test_missing_export_is_reported() {
    let (_, resolver) = memory_resolver(&[
        ("/a.css", r#":import("./b.css") { x: x; nope: absent; } .a { color: x; margin: nope; }"#),
        ("/b.css", ":export { x: red; }"),
    ]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();

    assert_eq!(resolution.source, ".a { color: red; margin: nope; }");
    assert_eq!(
        resolution.errors,
        vec![ResolveError::MissingExport {
            name: "absent".to_string(),
            path: ModulePath::new("/b.css"),
            importer: ModulePath::new("/a.css"),
        }]
    );
}

#[test]
fn test_entry_fetch_failure_is_returned() {
    let (_, resolver) = memory_resolver(&[]);
    let err = block_on(resolver.resolve_entry("nowhere.css")).unwrap_err();

    assert!(err.is_entry_failure());
    assert!(matches!(
        err,
        ResolveError::EntryFetchFailed { ref path, .. } if path.as_str() == "/nowhere.css"
    ));
}

#[test]
fn test_entry_parse_failure_points_into_source() {
    let source = ".a { color: red; }\n}";
    let (_, resolver) = memory_resolver(&[]);
    let err = block_on(resolver.resolve_source(ModulePath::new("/a.css"), source)).unwrap_err();

    match err {
        ResolveError::EntryParseFailed { span, source_text, .. } => {
            assert_eq!(source_text, source);
            assert_eq!(span.offset(), source.len() - 1);
        }
        other => panic!("Expected EntryParseFailed, got {:?}", other),
    }
}

#[test]
fn test_into_result_fails_fast() {
    let (_, resolver) = memory_resolver(&[("/a.css", r#":import("./missing.css") {} .a {}"#)]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();
    assert!(!resolution.is_complete());

    let err = resolution.into_result().unwrap_err();
    assert!(matches!(err, ResolveError::Unresolved { count: 1, .. }));
    assert_eq!(err.related().map(|related| related.count()), Some(1));
}

#[test]
fn test_into_result_passes_clean_resolution() {
    let (_, resolver) = memory_resolver(&[("/a.css", ".a {}")]);
    let resolution = block_on(resolver.resolve_entry("a.css")).unwrap();
    assert!(resolution.into_result().is_ok());
}

#[test]
fn test_diagnostic_codes() {
    let err = ResolveError::MissingExport {
        name: "x".to_string(),
        path: ModulePath::new("/b.css"),
        importer: ModulePath::new("/a.css"),
    };
    assert_eq!(err.code().unwrap().to_string(), "lattice_resolve::missing_export");
    assert_eq!(err.to_string(), "`/b.css` has no export named `x` (imported by `/a.css`)");

    let err = ResolveError::ImportFetchFailed {
        path: ModulePath::new("/b.css"),
        importer: ModulePath::new("/a.css"),
        source: FetchError::NotFound {
            path: ModulePath::new("/b.css"),
        },
    };
    assert_eq!(err.code().unwrap().to_string(), "lattice_resolve::import_fetch_failed");
    assert!(err.help().is_some());
}
