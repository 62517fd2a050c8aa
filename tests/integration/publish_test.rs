//! Integration tests for the publish pipeline
//!
//! These tests drive frontmatter splitting, registry construction and link
//! resolution together the way a publish run does.

use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use vaultpress_core::frontmatter::split_frontmatter;
use vaultpress_core::{
    convert_links, AssetDescriptor, Diagnostic, DiagnosticSeverity, PostRegistry, Publisher,
};

#[test]
fn test_post_links_to_itself_and_embeds_diagram() {
    let dir = tempdir().unwrap();
    let source = "---\ntitle: My First Post\n---\n\nSee [[My First Post]] and ![[diagram.svg]].";
    let path = dir.path().join("my-first-post.md");
    fs::write(&path, source).unwrap();

    let registry = PostRegistry::build(None, &[path]);
    assert_eq!(registry.lookup("my first post"), Some("my-first-post"));

    let (frontmatter, body) = split_frontmatter(source);
    let title = frontmatter.title().unwrap();
    let output = convert_links(&body, &registry, &title);

    assert_eq!(
        output.content.trim_start(),
        "See [My First Post](/posts/my-first-post/) and ![diagram](/assets/diagram.svg)."
    );
    assert_eq!(output.assets, vec![AssetDescriptor::svg("diagram.svg")]);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_duplicate_titles_follow_listing_order() {
    let dir = tempdir().unwrap();
    let ready = dir.path().join("Ready");
    fs::create_dir_all(&ready).unwrap();
    fs::write(ready.join("B.md"), "---\ntitle: shared notes\n---\nb\n").unwrap();
    fs::write(ready.join("A.md"), "---\ntitle: Shared Notes\nslug: ignored\n---\na\n").unwrap();

    let batch = vaultpress_core::registry::list_markdown_files(&ready);
    assert_eq!(batch, vec![ready.join("A.md"), ready.join("B.md")]);

    let registry = PostRegistry::build(None, &batch);
    assert_eq!(registry.lookup("Shared Notes"), Some("shared-notes"));
    assert_eq!(registry.source("Shared Notes"), Some(ready.join("B.md").as_path()));

    // Existing posts are registered before the batch
    let posts = dir.path().join("_posts");
    fs::create_dir_all(&posts).unwrap();
    fs::write(posts.join("2020-01-01-old.md"), "---\ntitle: SHARED NOTES\n---\nold\n").unwrap();
    let registry = PostRegistry::build(Some(&posts), &batch);
    assert_eq!(registry.source("shared notes"), Some(ready.join("B.md").as_path()));

    let output = convert_links("[[SHARED NOTES]]", &registry, "Post");
    assert_eq!(output.content, "[SHARED NOTES](/posts/shared-notes/)");
}

#[test]
fn test_code_is_never_rewritten() {
    let mut registry = PostRegistry::new();
    registry.insert_title("Target");

    let body = "[[Target]]\n\n```\n[[Target]]\n```\n\nInline `[[Target]]` too.";
    let output = convert_links(body, &registry, "Post");

    assert_eq!(
        output.content,
        "[Target](/posts/target/)\n\n```\n[[Target]]\n```\n\nInline `[[Target]]` too."
    );
}

#[test]
fn test_svg_embed_beats_registry_entry() {
    let mut registry = PostRegistry::new();
    registry.insert("chart.svg", "chart-post");

    let output = convert_links("![[chart.svg]] vs [[chart.svg]]", &registry, "Post");
    assert_eq!(
        output.content,
        "![chart](/assets/chart.svg) vs [chart.svg](/posts/chart-post/)"
    );
    assert_eq!(output.assets.len(), 1);
}

#[test]
fn test_unresolved_links_warn_once_each() {
    let output = convert_links("[[Ghost]] and [[Other Ghost]]", &PostRegistry::new(), "Haunted");

    assert_eq!(output.content, "Ghost and Other Ghost");
    assert_eq!(output.diagnostics.len(), 2);
    for (diag, text) in output.diagnostics.iter().zip(["Ghost", "Other Ghost"]) {
        assert_eq!(diag.severity, DiagnosticSeverity::Warning);
        assert!(diag.message.contains(text));
        assert!(diag.message.contains("Haunted"));
    }
}

#[test]
fn test_publish_run_end_to_end() {
    let root = tempdir().unwrap();
    let vault = root.path().join("vault");
    let repo = root.path().join("me.github.io");
    fs::create_dir_all(vault.join("Blog").join("Ready")).unwrap();
    fs::create_dir_all(vault.join("Excalidraw")).unwrap();
    fs::create_dir_all(repo.join("_posts")).unwrap();
    fs::create_dir_all(repo.join("assets")).unwrap();

    fs::write(vault.join("Excalidraw").join("flow.excalidraw.svg"), "<svg/>").unwrap();
    fs::write(
        vault.join("Blog").join("Ready").join("flow.md"),
        "---\ntitle: Data Flow\ndate created: 2024-02-03\ncategories: [notes]\n---\n\n![[flow.excalidraw]]\n\nSee [[Data Flow]].\n",
    )
    .unwrap();

    let paths = vaultpress_core::detect_default_paths(&vault, None, None)
        .into_publish_paths()
        .unwrap();
    assert_eq!(paths.blog_posts, repo.join("_posts"));

    let mut diags: Vec<Diagnostic> = Vec::new();
    let report = Publisher::new(paths.clone()).publish(&mut diags).unwrap();

    assert_eq!(report.found, 1);
    assert_eq!(report.published.len(), 1, "failures: {:?}", report.failures);
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

    let post = &report.published[0];
    assert!(post.filename.ends_with("-data-flow.md"));
    assert_eq!(post.assets, vec!["flow.svg".to_string()]);

    let written: PathBuf = repo.join("_posts").join(&post.filename);
    let contents = fs::read_to_string(written).unwrap();
    assert!(contents.starts_with("---\ntitle: Data Flow\ndate: 2024-02-03 00:00:00"));
    assert!(contents.contains("categories:\n- notes\n"));
    assert!(contents.contains("![flow](/assets/flow.svg)"));
    assert!(contents.contains("See [Data Flow](/posts/data-flow/)."));
    assert!(repo.join("assets").join("flow.svg").is_file());
    assert!(vault.join("Blog").join("Published").join(&post.filename).is_file());
}
