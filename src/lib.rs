//! # nobloat
//!
//! A minimal static blog generator. A directory of dated markdown articles
//! goes in; plain HTML pages, a sitemap and an Atom feed come out.
//!
//! # Architecture: Load, Then Generate
//!
//! A build is a single synchronous pass:
//!
//! ```text
//! 1. Load      articles/*.md  →  PostCollection   (filename date + block parser)
//! 2. Generate  PostCollection →  public/          (index, posts, sitemap, feed)
//! ```
//!
//! The loader never sees the site config and the parser never sees the
//! filesystem, so each piece is tested on its own: the markdown modules are
//! pure string transforms, the loader only needs a temp directory, and the
//! generators take an in-memory collection.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`inline`] | Inline formatter: escaping, links, images, code, emphasis |
//! | [`anchor`] | Heading text → URL-fragment id |
//! | [`markdown`] | Line-oriented block parser producing body HTML, title and excerpt |
//! | [`naming`] | `YYYY-MM-DD-<slug>` article filename convention |
//! | [`scan`] | Discovers and loads articles into a sorted [`types::PostCollection`] |
//! | [`types`] | `Post` and `PostCollection`, shared by loader and generators |
//! | [`config`] | `config.toml` loading, validation and merging over stock defaults |
//! | [`generate`] | Renders the site with Maud; writes sitemap and Atom feed |
//! | [`output`] | CLI output formatting for check and build results |
//! | [`watch`] | Rebuild-on-change loop |
//!
//! # Design Decisions
//!
//! ## A Deliberately Small Markdown Dialect
//!
//! The parser is line-oriented: every line is exactly one block. There is no
//! nesting, no lazy continuation and no reference links. What it supports
//! (headings, lists, quotes, fenced code, inline emphasis, links, images) is
//! what a technical blog actually uses, and the whole dialect fits in your
//! head when writing.
//!
//! ## The Filename Is the Metadata
//!
//! Publish date and slug come from the filename (`2024-03-09-hello.md`), the
//! title from the first `# ` line. No front-matter, no database. A file that
//! does not follow the convention is skipped with a warning, never fatal.
//!
//! ## Reproducible Output
//!
//! Nothing in the output depends on the wall clock or on directory listing
//! order. Building the same input twice produces byte-identical files, and
//! files whose content did not change are not rewritten.

pub mod anchor;
pub mod config;
pub mod generate;
pub mod inline;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod scan;
pub mod types;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;

use config::{ConfigError, SiteConfig};
use generate::{GenerateError, GenerateReport};
use scan::{Manifest, ScanError, SkippedFile};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use types::PostCollection;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("load error: {0}")]
    Scan(#[from] ScanError),
    #[error("generate error: {0}")]
    Generate(#[from] GenerateError),
}

/// Where a build reads from and writes to.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Site root: holds `config.toml`, the articles directory and the stylesheet.
    pub source: PathBuf,
    /// Output directory for the generated site.
    pub output: PathBuf,
    /// Explicit config file; `<source>/config.toml` when `None`.
    pub config: Option<PathBuf>,
}

impl BuildOptions {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            config: None,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.source.join("config.toml"))
    }

    pub fn articles_dir(&self, config: &SiteConfig) -> PathBuf {
        self.source.join(&config.articles_dir)
    }

    pub fn stylesheet(&self, config: &SiteConfig) -> PathBuf {
        self.source.join(&config.stylesheet)
    }
}

/// Config plus loaded articles: everything a build knows before writing.
#[derive(Debug)]
pub struct Site {
    pub config: SiteConfig,
    pub manifest: Manifest,
}

/// What one build produced.
#[derive(Debug)]
pub struct BuildReport {
    /// Posts that made it into the site, newest first.
    pub posts: PostCollection,
    /// Articles left out, with the reason.
    pub skipped: Vec<SkippedFile>,
    pub files: GenerateReport,
}

/// Load the config and every article without writing anything.
pub fn load_site(options: &BuildOptions) -> Result<Site, BuildError> {
    let config_path = options.config_path();
    debug!(path = %config_path.display(), "loading config");
    let config = config::load_config(&config_path)?;
    let manifest = scan::load_posts(&options.articles_dir(&config))?;
    Ok(Site { config, manifest })
}

/// Run one full build: load config and posts, then write the whole site.
pub fn build_site(options: &BuildOptions) -> Result<BuildReport, BuildError> {
    let Site { config, manifest } = load_site(options)?;
    let files = generate::generate(&manifest.posts, &config, &options.source, &options.output)?;
    Ok(BuildReport {
        posts: manifest.posts,
        skipped: manifest.skipped,
        files,
    })
}

/// True when `path` has the article extension `.md` (lowercase only).
pub(crate) fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "md")
}
