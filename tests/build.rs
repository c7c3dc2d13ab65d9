//! End-to-end build of the fixture site.

use nobloat::{BuildOptions, build_site};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn copy_dir(src: &Path, dst: &Path) {
    fs::create_dir_all(dst).unwrap();
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let to = dst.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir(&entry.path(), &to);
        } else {
            fs::copy(entry.path(), &to).unwrap();
        }
    }
}

fn fixture_site() -> (TempDir, BuildOptions) {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    let root = tmp.path().join("site");
    copy_dir(&fixtures, &root);
    let options = BuildOptions::new(&root, tmp.path().join("public"));
    (tmp, options)
}

/// Every output file, sorted, with its bytes.
fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .map(|p| {
            let bytes = fs::read(&p).unwrap();
            (p.strip_prefix(dir).unwrap().to_path_buf(), bytes)
        })
        .collect();
    files.sort();
    files
}

fn read(options: &BuildOptions, name: &str) -> String {
    fs::read_to_string(options.output.join(name)).unwrap()
}

#[test]
fn builds_expected_files() {
    let (_tmp, options) = fixture_site();

    build_site(&options).unwrap();

    let names: Vec<PathBuf> = snapshot(&options.output).into_iter().map(|(p, _)| p).collect();
    assert_eq!(
        names,
        vec![
            PathBuf::from("2023-09-01-hello-world.html"),
            PathBuf::from("2024-02-10-boring-technology.html"),
            PathBuf::from("2024-02-10-line-oriented-markdown.html"),
            PathBuf::from("feed.xml"),
            PathBuf::from("index.html"),
            PathBuf::from("sitemap.xml"),
            PathBuf::from("style.css"),
        ]
    );
}

#[test]
fn rebuild_is_byte_identical_and_writes_nothing() {
    let (_tmp, options) = fixture_site();

    build_site(&options).unwrap();
    let first = snapshot(&options.output);
    let report = build_site(&options).unwrap();
    let second = snapshot(&options.output);

    assert_eq!(first, second);
    assert!(report.files.written.is_empty());
    assert_eq!(report.files.unchanged.len(), 7);
}

#[test]
fn editing_one_article_rewrites_only_affected_files() {
    let (_tmp, options) = fixture_site();
    build_site(&options).unwrap();

    let article = options.source.join("articles/2023-09-01-hello-world.md");
    let text = fs::read_to_string(&article).unwrap();
    fs::write(&article, text.replace("Less is more.", "Less is enough.")).unwrap();

    let report = build_site(&options).unwrap();

    // The quote is not part of the excerpt, so index and feed stay the same.
    assert_eq!(report.files.written, vec!["2023-09-01-hello-world.html"]);
}

#[test]
fn post_page_renders_markdown() {
    let (_tmp, options) = fixture_site();
    build_site(&options).unwrap();

    let html = read(&options, "2023-09-01-hello-world.html");
    assert!(html.contains("<title>Hello, World! - ][ nobloat.org</title>"));
    assert!(html.contains("<h1>Hello, World!</h1>"));
    assert!(html.contains("<p>This blog is built from <strong>plain</strong> markdown files.</p>"));
    assert!(html.contains(r##"<h2 id="why"><a href="#why">Why</a></h2>"##));
    assert!(html.contains("<ul>\n<li>no JavaScript</li>\n<li>no tracking</li>\n<li>no build pipeline</li>\n</ul>"));
    assert!(html.contains("<blockquote>Less is more.</blockquote>"));

    let html = read(&options, "2024-02-10-boring-technology.html");
    assert!(html.contains("<pre><code class=\"language-go\">func main() {}\n</code></pre>"));

    let html = read(&options, "2024-02-10-line-oriented-markdown.html");
    assert!(html.contains(
        r#"<figure><img src="logo.png" alt="A tiny logo"><figcaption>A tiny logo</figcaption></figure>"#
    ));
}

#[test]
fn index_lists_posts_newest_first() {
    let (_tmp, options) = fixture_site();
    build_site(&options).unwrap();

    let index = read(&options, "index.html");
    let boring = index.find("2024-02-10-boring-technology.html").unwrap();
    let line = index.find("2024-02-10-line-oriented-markdown.html").unwrap();
    let hello = index.find("2023-09-01-hello-world.html").unwrap();
    assert!(boring < line && line < hello);
    assert!(index.contains("Boring tools let you spend your <em>innovation tokens</em> elsewhere."));
    assert!(!index.contains("Unfinished thoughts"));
}

#[test]
fn sitemap_and_feed_use_base_url_and_post_dates() {
    let (_tmp, options) = fixture_site();
    build_site(&options).unwrap();

    let sitemap = read(&options, "sitemap.xml");
    assert!(sitemap.contains("<loc>https://nobloat.org/2023-09-01-hello-world.html</loc>"));
    assert!(sitemap.contains("<loc>https://nobloat.org/index.html</loc>\n    <lastmod>2024-02-10</lastmod>"));

    let feed = read(&options, "feed.xml");
    assert!(feed.contains("<updated>2024-02-10T00:00:00Z</updated>"));
    assert_eq!(feed.matches("<entry>").count(), 3);
    assert!(feed.contains("<title>Hello, World!</title>"));
}

#[test]
fn bad_articles_do_not_fail_the_build() {
    let (_tmp, options) = fixture_site();
    let articles = options.source.join("articles");
    fs::write(articles.join("2024-13-45-nope.md"), "# Nope").unwrap();
    fs::write(articles.join("short.md"), "# Short").unwrap();

    let report = build_site(&options).unwrap();

    assert_eq!(report.posts.len(), 3);
    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.file_name.as_str()).collect();
    assert_eq!(skipped, vec!["2024-13-45-nope.md", "draft.md", "short.md"]);
}
