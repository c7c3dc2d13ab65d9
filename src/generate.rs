//! HTML, sitemap and feed generation.
//!
//! Takes the sorted post collection plus the site config and writes the
//! finished site.
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! ├── index.html                        # Post list, projects, tools, links
//! ├── 2024-03-09-hello-world.html       # One page per post, named by slug
//! ├── 2023-11-30-older.html
//! ├── sitemap.xml                       # Every post + the index page
//! ├── feed.xml                          # Atom feed, newest first
//! └── style.css                         # Copied from the site root if present
//! ```
//!
//! ## Determinism
//!
//! Output depends only on the articles and the config. Dates in the sitemap
//! and feed come from post publish dates, never the wall clock, so rebuilding
//! unchanged input yields byte-identical files. Files are only rewritten when
//! their content actually changed, which keeps mtimes stable for rsync-style
//! deploys.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Interpolated strings are escaped; post bodies and excerpts are trusted
//! parser output and are inserted with `PreEscaped`.

use crate::config::SiteConfig;
use crate::inline;
use crate::types::{Post, PostCollection};
use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Files produced by one generate run, relative to the output directory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GenerateReport {
    /// Files whose content changed (or that did not exist yet).
    pub written: Vec<String>,
    /// Files that already held identical content.
    pub unchanged: Vec<String>,
}

impl GenerateReport {
    fn record(&mut self, name: String, changed: bool) {
        if changed {
            self.written.push(name);
        } else {
            self.unchanged.push(name);
        }
    }

    pub fn total(&self) -> usize {
        self.written.len() + self.unchanged.len()
    }
}

/// Write the whole site for `posts` into `output_dir`.
///
/// `site_root` is where the stylesheet named in the config is looked up.
pub fn generate(
    posts: &PostCollection,
    config: &SiteConfig,
    site_root: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir).map_err(GenerateError::io(output_dir))?;
    let mut report = GenerateReport::default();

    let mut emit = |name: String, content: &[u8]| -> Result<(), GenerateError> {
        let path = output_dir.join(&name);
        let changed = write_if_changed(&path, content).map_err(GenerateError::io(&path))?;
        debug!(file = %name, changed, "generated");
        report.record(name, changed);
        Ok(())
    };

    if let Some(css) = read_stylesheet(site_root, config)? {
        emit(stylesheet_href(config), &css)?;
    }

    emit(
        "index.html".to_string(),
        render_index(posts, config).into_string().as_bytes(),
    )?;

    for post in posts {
        emit(
            post_file_name(post),
            render_post_page(post, config).into_string().as_bytes(),
        )?;
    }

    emit("sitemap.xml".to_string(), render_sitemap(posts, config).as_bytes())?;
    emit("feed.xml".to_string(), render_feed(posts, config).as_bytes())?;

    Ok(report)
}

/// Write `content` to `path` unless the file already holds exactly that.
///
/// Returns whether a write happened.
pub fn write_if_changed(path: &Path, content: &[u8]) -> std::io::Result<bool> {
    match fs::read(path) {
        Ok(existing) if existing == content => Ok(false),
        _ => {
            fs::write(path, content)?;
            Ok(true)
        }
    }
}

/// Output filename for a post page.
pub fn post_file_name(post: &Post) -> String {
    format!("{}.html", post.slug)
}

fn stylesheet_href(config: &SiteConfig) -> String {
    Path::new(&config.stylesheet)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "style.css".to_string())
}

/// Read the configured stylesheet; a missing file is not an error.
fn read_stylesheet(site_root: &Path, config: &SiteConfig) -> Result<Option<Vec<u8>>, GenerateError> {
    let path = site_root.join(&config.stylesheet);
    if !path.is_file() {
        debug!(path = %path.display(), "no stylesheet to copy");
        return Ok(None);
    }
    fs::read(&path).map(Some).map_err(GenerateError::io(&path))
}

/// Title shown for a post; falls back to the slug for untitled posts.
fn display_title(post: &Post) -> &str {
    if post.title.is_empty() {
        &post.slug
    } else {
        &post.title
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, config: &SiteConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(stylesheet_href(config));
                link rel="alternate" type="application/atom+xml" title=(config.title) href="feed.xml";
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header shared by all pages
fn site_header(config: &SiteConfig) -> Markup {
    html! {
        header.site-header {
            a.site-title href="index.html" { (config.title) }
            @if !config.slogan.is_empty() {
                p.slogan { (config.slogan) }
            }
        }
    }
}

fn render_date(date: NaiveDate) -> Markup {
    let iso = date.format("%Y-%m-%d").to_string();
    html! {
        time datetime=(iso) { (iso) }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page: post list followed by projects, tools and links
fn render_index(posts: &PostCollection, config: &SiteConfig) -> Markup {
    let content = html! {
        (site_header(config))
        main.index-page {
            section.posts {
                h2 { "Articles" }
                ul.post-list {
                    @for post in posts {
                        li {
                            (render_date(post.publish_date))
                            " "
                            a href=(post_file_name(post)) { (display_title(post)) }
                            @if !post.excerpt.is_empty() {
                                p.excerpt { (PreEscaped(&post.excerpt)) }
                            }
                        }
                    }
                }
            }
            @if !config.projects.is_empty() {
                section.projects {
                    h2 { "Projects" }
                    ul {
                        @for (name, description) in &config.projects {
                            li {
                                (PreEscaped(inline::format(name)))
                                " - "
                                (PreEscaped(inline::format(description)))
                            }
                        }
                    }
                }
            }
            @if !config.tools.is_empty() {
                section.tools {
                    h2 { "Tools" }
                    ul {
                        @for tool in &config.tools {
                            li {
                                a href=(tool.url) { (tool.name) }
                                " - "
                                (tool.description)
                            }
                        }
                    }
                }
            }
            @if !config.links.is_empty() {
                section.links {
                    h2 { "Links" }
                    ul {
                        @for (label, url) in &config.links {
                            li { a href=(url) { (label) } }
                        }
                    }
                }
            }
        }
    };

    base_document(&config.title, config, content)
}

/// Renders a single post page
fn render_post_page(post: &Post, config: &SiteConfig) -> Markup {
    let page_title = if post.title.is_empty() {
        config.title.clone()
    } else {
        format!("{} - {}", post.title, config.title)
    };

    let content = html! {
        (site_header(config))
        main.post-page {
            article.post {
                p.post-meta { (render_date(post.publish_date)) }
                (PreEscaped(&post.content_html))
            }
            nav.back {
                a href="index.html" { "\u{2190} All articles" }
            }
        }
    };

    base_document(&page_title, config, content)
}

// ============================================================================
// Sitemap and feed
// ============================================================================

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Wrap `text` in a CDATA section, splitting any embedded `]]>`.
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

/// Midnight UTC on `date`, formatted as RFC 3339.
fn rfc3339(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Render `sitemap.xml`: one entry per post, then the index page.
///
/// The index page's `lastmod` is the newest post's date.
pub fn render_sitemap(posts: &PostCollection, config: &SiteConfig) -> String {
    let base = config.base();
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for post in posts {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>\n",
            xml_escape(&format!("{base}/{}", post_file_name(post))),
            post.publish_date.format("%Y-%m-%d"),
        ));
    }
    xml.push_str(&format!(
        "  <url>\n    <loc>{}</loc>\n",
        xml_escape(&format!("{base}/index.html"))
    ));
    if let Some(newest) = posts.newest() {
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            newest.publish_date.format("%Y-%m-%d")
        ));
    }
    xml.push_str("  </url>\n</urlset>\n");
    xml
}

/// Render `feed.xml` as an Atom 1.0 feed, newest entry first.
pub fn render_feed(posts: &PostCollection, config: &SiteConfig) -> String {
    let base = config.base();
    let updated = rfc3339(posts.newest().map(|p| p.publish_date).unwrap_or_default());

    let mut entries = String::new();
    for post in posts {
        let link = xml_escape(&format!("{base}/{}", post_file_name(post)));
        entries.push_str(&format!(
            "  <entry>\n    <title>{}</title>\n    <link href=\"{}\"/>\n    <id>{}</id>\n    <updated>{}</updated>\n    <summary type=\"html\">{}</summary>\n  </entry>\n",
            xml_escape(display_title(post)),
            link,
            link,
            rfc3339(post.publish_date),
            cdata(&post.excerpt),
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<feed xmlns=\"http://www.w3.org/2005/Atom\">\n  <title>{}</title>\n  <id>{}/</id>\n  <updated>{}</updated>\n  <link href=\"{}/feed.xml\" rel=\"self\"/>\n  <link href=\"{}/\"/>\n{}</feed>\n",
        xml_escape(&config.title),
        xml_escape(base),
        updated,
        xml_escape(base),
        xml_escape(base),
        entries
    )
}

// ============================================================================
// Tests
// ============================================================================
