//! Article discovery and loading.
//!
//! Reads every `*.md` file directly inside the articles directory (no
//! recursion), derives its publish date from the filename, runs it through
//! the [block parser](crate::markdown) and collects the results into a
//! [`PostCollection`] sorted newest first.
//!
//! ## Directory Structure
//!
//! ```text
//! articles/
//! ├── 2024-03-09-hello-world.md     # Post, published 2024-03-09
//! ├── 2024-03-09-second-post.md     # Same date: sorted by filename
//! ├── 2023-11-30-older.md
//! ├── drafts.md                     # Skipped with a warning (no date)
//! ├── 2024-13-40-typo.md            # Skipped with a warning (bad date)
//! └── notes.txt                     # Ignored (not markdown)
//! ```
//!
//! ## Failure Handling
//!
//! A bad filename or a file that is not valid UTF-8 costs only that file: it
//! is logged once at `warn` level, recorded in [`Manifest::skipped`] and the
//! build continues. A missing or unreadable articles directory, or an I/O
//! error while reading a file, aborts the load.
//!
//! Discovery order is filename order, so posts that share a publish date
//! come out in a stable, reproducible order.

use crate::markdown;
use crate::naming::{self, NameError};
use crate::types::{Post, PostCollection};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Why a single article was left out of the collection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error("content is not valid UTF-8")]
    NotUtf8,
}

/// An article that was discovered but not loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: SkipReason,
}

/// Output of the load stage.
#[derive(Debug, Default)]
pub struct Manifest {
    pub posts: PostCollection,
    pub skipped: Vec<SkippedFile>,
}

/// Load every article in `dir` into a sorted post collection.
pub fn load_posts(dir: &Path) -> Result<Manifest, ScanError> {
    let mut posts = Vec::new();
    let mut skipped = Vec::new();

    for path in markdown_files(dir)? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match load_post(&path)? {
            Ok(post) => {
                debug!(file = %file_name, slug = %post.slug, date = %post.publish_date, "loaded post");
                posts.push(post);
            }
            Err(reason) => {
                warn!(file = %file_name, %reason, "skipping article");
                skipped.push(SkippedFile { file_name, reason });
            }
        }
    }

    Ok(Manifest {
        posts: PostCollection::from_unsorted(posts),
        skipped,
    })
}

/// Load a single article.
///
/// The outer `Result` is fatal for the whole build; the inner one only
/// rejects this file.
fn load_post(path: &Path) -> Result<Result<Post, SkipReason>, ScanError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match naming::parse_post_name(&stem) {
        Ok(name) => name,
        Err(e) => return Ok(Err(e.into())),
    };

    let bytes = fs::read(path).map_err(ScanError::io(path))?;
    let Ok(text) = String::from_utf8(bytes) else {
        return Ok(Err(SkipReason::NotUtf8));
    };

    let parsed = markdown::parse(&text);
    Ok(Ok(Post {
        title: parsed.title,
        slug: name.slug,
        publish_date: name.date,
        content_html: parsed.content_html,
        excerpt: parsed.excerpt,
    }))
}

/// Regular `.md` files directly inside `dir`, sorted by path.
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(ScanError::io(dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && crate::is_markdown(p))
        .collect();

    files.sort();
    Ok(files)
}
