use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// A vault directory next to a blog repository, both empty
struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let root = tempdir()?;
        fs::create_dir_all(root.path().join("vault").join("Ready"))?;
        fs::create_dir_all(root.path().join("blog").join("_posts"))?;
        Ok(Self { root })
    }

    fn vault(&self) -> PathBuf {
        self.root.path().join("vault")
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    fn cmd(&self) -> Result<Command, Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("vaultpress")?;
        cmd.current_dir(self.vault())
            .env("HOME", self.root.path())
            .env_remove("VAULTPRESS_CONFIG")
            .env_remove("RUST_LOG");
        Ok(cmd)
    }
}

fn posts_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn publish_with_explicit_directories() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new()?;
    fs::write(
        ws.path("vault/Ready/hello.md"),
        "---\ntitle: Hello World\ntags: [intro]\n---\nSee ![[sketch.svg]] and `[[not a link]]`.\n",
    )?;
    fs::write(ws.path("vault/Ready/sketch.svg"), "<svg/>")?;

    ws.cmd()?
        .args(["--ready-dir", "Ready", "--published-dir", "Published"])
        .arg("--blog-dir")
        .arg(ws.path("blog/_posts"))
        .arg("--assets-dir")
        .arg(ws.path("blog/assets"))
        .args(["--date", "2024-05-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully published 1 post(s)!"))
        .stdout(predicate::str::contains("Next steps:"));

    let posts = posts_in(&ws.path("blog/_posts"));
    assert_eq!(posts.len(), 1);
    assert!(posts[0].ends_with("-hello-world.md"));

    let post = fs::read_to_string(ws.path("blog/_posts").join(&posts[0]))?;
    assert!(post.starts_with("---\ntitle: Hello World\n"));
    assert!(post.contains("date: 2024-05-06 00:00:00"));
    assert!(post.contains("See ![sketch](/assets/sketch.svg) and `[[not a link]]`."));

    assert_eq!(posts_in(&ws.path("vault/Published")), posts);
    assert!(ws.path("blog/assets/sketch.svg").is_file());
    Ok(())
}

#[test]
fn publish_reports_empty_ready_directory() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new()?;

    ws.cmd()?
        .args(["--ready-dir", "Ready", "--published-dir", "Published"])
        .arg("--blog-dir")
        .arg(ws.path("blog/_posts"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No posts found to publish."));

    assert!(posts_in(&ws.path("blog/_posts")).is_empty());
    Ok(())
}

#[test]
fn publish_without_ready_directory_fails() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new()?;

    ws.cmd()?
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Could not find Ready directory. Please specify --ready-dir",
        ));
    Ok(())
}

#[test]
fn publish_with_missing_blog_directory_fails() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new()?;

    ws.cmd()?
        .args(["--ready-dir", "Ready", "--published-dir", "Published"])
        .arg("--blog-dir")
        .arg(ws.path("nowhere/_posts"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Blog posts directory not found"));
    Ok(())
}

#[test]
fn publish_reads_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new()?;
    fs::write(
        ws.path("vault/vaultpress.yml"),
        r#"
paths:
  ready: "Ready"
  published: "Published"
  blog_posts: "../blog/_posts"
"#,
    )?;
    fs::write(ws.path("vault/Ready/one.md"), "---\ntitle: One\n---\nLinks to [[Two]].\n")?;
    fs::write(ws.path("vault/Ready/two.md"), "---\ntitle: Two\n---\nLinks to [[Nowhere]].\n")?;

    ws.cmd()?
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully published 2 post(s)!"))
        .stdout(predicate::str::contains("Unresolved wikilink [[Nowhere]]"));

    let posts = posts_in(&ws.path("blog/_posts"));
    let one = posts.iter().find(|p| p.ends_with("-one.md")).unwrap();
    let contents = fs::read_to_string(ws.path("blog/_posts").join(one))?;
    assert!(contents.contains("Links to [Two](/posts/two/)."));
    Ok(())
}

#[test]
fn detects_vault_and_blog_layout() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new()?;
    fs::create_dir_all(ws.path("vault/Blog/Ready"))?;
    fs::create_dir_all(ws.path("me.github.io/_posts"))?;

    ws.cmd()?
        .arg("paths")
        .assert()
        .success()
        .stdout(predicate::str::contains("Blog/Ready"))
        .stdout(predicate::str::contains("me.github.io"))
        .stdout(predicate::str::contains("(not set)"));
    Ok(())
}

#[test]
fn rejects_unparseable_date() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new()?;

    ws.cmd()?
        .args(["--date", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized date"));
    Ok(())
}
