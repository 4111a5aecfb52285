//! End-to-end conversion scenarios against temporary vaults.

use chrono::{DateTime, FixedOffset, TimeZone};
use notebundle::attachment::fingerprint;
use notebundle::parser::parse_note_content;
use notebundle::{ConvertConfig, Converter, MemorySink, RunReport, Severity};
use pretty_assertions::assert_eq;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct TestVault {
    dir: TempDir,
}

impl TestVault {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Notes")).unwrap();
        fs::create_dir_all(dir.path().join("Attachments")).unwrap();
        Self { dir }
    }

    fn note(&self, relative: &str, content: &str) {
        let path = self.dir.path().join("Notes").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn attachment(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join("Attachments").join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn posts(&self) -> PathBuf {
        self.dir.path().join("posts")
    }

    fn config(&self) -> ConvertConfig {
        ConvertConfig {
            notes_dir: Some(self.dir.path().join("Notes")),
            attachments_dir: Some(self.dir.path().join("Attachments")),
            posts_dir: Some(self.posts()),
            ..ConvertConfig::default()
        }
    }

    fn convert(&self, config: &ConvertConfig) -> RunReport {
        let sink = MemorySink::new(Severity::Debug);
        Converter::new(config, &sink)
            .unwrap()
            .with_fixed_time(fixed_now())
            .run()
            .unwrap()
    }

    fn index(&self, bundle: &str) -> String {
        fs::read_to_string(self.posts().join(bundle).join("index.md")).unwrap()
    }
}

fn fixed_now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 3, 14, 15, 9, 26)
        .unwrap()
}

fn emitted_properties(doc: &str) -> serde_yaml::Mapping {
    parse_note_content(doc, Path::new("index.md"), &MemorySink::default()).0
}

fn tags_of(properties: &serde_yaml::Mapping) -> Option<Vec<String>> {
    properties.get("tags").map(|tags| {
        tags.as_sequence()
            .unwrap()
            .iter()
            .map(|t| t.as_str().unwrap().to_string())
            .collect()
    })
}

const FOO: &str = "---\ntags: [blog, draft]\n---\nSee ![[diagram.png]]";

#[test]
fn foo_scenario_keeps_tags() {
    let vault = TestVault::new();
    let source = vault.attachment("diagram.png", b"\x89PNG fake image");
    vault.note("Foo.md", FOO);

    vault.convert(&vault.config());

    let digest = fingerprint(&source).unwrap();
    let doc = vault.index("Foo");
    let props = emitted_properties(&doc);

    assert_eq!(props.get("title").and_then(Value::as_str), Some("Foo"));
    assert!(props.get("date").and_then(Value::as_str).is_some());
    assert_eq!(tags_of(&props), Some(vec!["blog".to_string(), "draft".to_string()]));
    assert!(doc.ends_with(&format!("\n---\n\nSee ![]({}.png)", digest)));
    assert_eq!(
        fs::read(vault.posts().join("Foo").join(format!("{}.png", digest))).unwrap(),
        b"\x89PNG fake image"
    );
}

#[test]
fn foo_scenario_removes_selection_tag() {
    let vault = TestVault::new();
    vault.attachment("diagram.png", b"img");
    vault.note("Foo.md", FOO);
    let config = ConvertConfig {
        remove_filter_tag: true,
        ..vault.config()
    };

    vault.convert(&config);

    let props = emitted_properties(&vault.index("Foo"));
    assert_eq!(tags_of(&props), Some(vec!["draft".to_string()]));
}

#[test]
fn only_selection_tag_removed_drops_tags_key() {
    let vault = TestVault::new();
    vault.note("Solo.md", "---\ntags: [blog]\n---\nBody");
    let config = ConvertConfig {
        remove_filter_tag: true,
        ..vault.config()
    };

    vault.convert(&config);

    let doc = vault.index("Solo");
    assert!(!doc.contains("tags"));
    let keys: Vec<_> = emitted_properties(&doc)
        .keys()
        .map(|k| k.as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["title", "date"]);
}

#[test]
fn string_and_list_tags_select_alike() {
    let vault = TestVault::new();
    vault.note("A.md", "---\ntags: 'notes, blog , misc'\n---\nA");
    vault.note("B.md", "---\ntags:\n  - notes\n  - blog\n  - misc\n---\nB");

    let report = vault.convert(&vault.config());
    assert_eq!(report.written.len(), 2);

    let a = tags_of(&emitted_properties(&vault.index("A")));
    let b = tags_of(&emitted_properties(&vault.index("B")));
    assert_eq!(a, b);
    assert_eq!(a, Some(vec!["notes".to_string(), "blog".to_string(), "misc".to_string()]));
}

#[test]
fn second_run_is_byte_identical_with_explicit_date() {
    let vault = TestVault::new();
    vault.attachment("a.png", b"a");
    vault.note(
        "Stable.md",
        "---\ntitle: Stable\ndate: 2024-01-01\ntags: blog\n---\n\n![[a.png]] and [[Link]]\n",
    );

    vault.convert(&vault.config());
    let first = vault.index("Stable");

    // A different clock must not matter when the note carries its own date.
    let sink = MemorySink::default();
    let later = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    Converter::new(&vault.config(), &sink)
        .unwrap()
        .with_fixed_time(later)
        .run()
        .unwrap();
    let second = vault.index("Stable");

    assert_eq!(first, second);
}

#[test]
fn defaulted_date_is_the_only_non_idempotent_field() {
    let vault = TestVault::new();
    vault.note("NoDate.md", "---\ntags: [blog]\n---\nBody");

    vault.convert(&vault.config());
    let first = emitted_properties(&vault.index("NoDate"));

    let sink = MemorySink::default();
    let later = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    Converter::new(&vault.config(), &sink)
        .unwrap()
        .with_fixed_time(later)
        .run()
        .unwrap();
    let second = emitted_properties(&vault.index("NoDate"));

    assert_ne!(first.get("date"), second.get("date"));

    let mut first = first;
    let mut second = second;
    first.shift_remove("date");
    second.shift_remove("date");
    assert_eq!(first, second);
}

#[test]
fn identical_attachments_share_one_target() {
    let vault = TestVault::new();
    vault.attachment("one.png", b"same content");
    vault.attachment("two.png", b"same content");
    vault.note("Dup.md", "---\ntags: [blog]\n---\n![[one.png]]\n![[two.png]]");

    let report = vault.convert(&vault.config());

    let doc = vault.index("Dup");
    let body = doc.split("---\n\n").nth(1).unwrap();
    let lines: Vec<_> = body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], lines[1]);

    let files: Vec<_> = fs::read_dir(vault.posts().join("Dup"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name != "index.md")
        .collect();
    assert_eq!(files.len(), 1);
    assert_eq!(report.written[0].attachments, files);
}

#[test]
fn missing_attachment_left_in_place() {
    let vault = TestVault::new();
    vault.note("Broken.md", "---\ntags: [blog]\n---\nLook: ![[nowhere.png]]");

    let sink = MemorySink::new(Severity::Info);
    let report = Converter::new(&vault.config(), &sink)
        .unwrap()
        .with_fixed_time(fixed_now())
        .run()
        .unwrap();

    assert!(vault.index("Broken").ends_with("Look: ![[nowhere.png]]"));
    assert_eq!(report.unresolved_attachments.len(), 1);
    assert!(
        sink.messages(Severity::Warning)
            .iter()
            .any(|m| m.contains("nowhere.png"))
    );
}

#[test]
fn malformed_frontmatter_note_is_skipped_without_tags() {
    let vault = TestVault::new();
    vault.note("Bad.md", "---\ntags: [blog\n---\nBody");

    let report = vault.convert(&vault.config());

    assert_eq!(report.skipped.len(), 1);
    assert!(!vault.posts().join("Bad").exists());
}

#[test]
fn note_without_frontmatter_is_skipped() {
    let vault = TestVault::new();
    vault.note("Plain.md", "Just text with #blog inline.");

    let report = vault.convert(&vault.config());
    assert_eq!(report.skipped.len(), 1);
    assert!(report.written.is_empty());
}

#[test]
fn excluded_subtree_never_selected() {
    let vault = TestVault::new();
    vault.note("Templates/Post.md", "---\ntags: [blog]\n---\n{{title}}");
    vault.note("Templates-old/Keep.md", "---\ntags: [blog]\n---\nkept");
    let config = ConvertConfig {
        exclude_dirs: vec!["Templates".to_string()],
        ..vault.config()
    };

    let report = vault.convert(&config);

    assert_eq!(report.excluded.len(), 1);
    assert!(!vault.posts().join("Post").exists());
    assert!(vault.posts().join("Keep").join("index.md").is_file());
}

#[test]
fn custom_filter_tag_and_index_name() {
    let vault = TestVault::new();
    vault.note("Page.md", "---\ntags: [publish]\n---\nBody");
    vault.note("Other.md", "---\ntags: [blog]\n---\nBody");
    let config = ConvertConfig {
        filter_tag: "publish".to_string(),
        index_name: "_index.md".to_string(),
        ..vault.config()
    };

    let report = vault.convert(&config);

    assert_eq!(report.written.len(), 1);
    assert!(vault.posts().join("Page").join("_index.md").is_file());
    assert!(!vault.posts().join("Other").exists());
}

#[test]
fn emitted_document_round_trips() {
    let vault = TestVault::new();
    vault.note(
        "Round.md",
        "---\ntitle: Round\nextra:\n  nested: [1, 2]\ntags: blog\n---\nText\n\n---\n\nAfter rule",
    );

    vault.convert(&vault.config());
    let doc = vault.index("Round");

    let (props, body) = parse_note_content(&doc, Path::new("index.md"), &MemorySink::default());
    let rendered = notebundle::bundle::render_document(&props, &body).unwrap();
    assert_eq!(rendered, doc);
    assert_eq!(body, "Text\n\n---\n\nAfter rule");
}
