//! Shared test utilities for the nobloat test suite.
//!
//! Provides fixture setup and lookup helpers that work with load-stage data
//! structures (`Manifest`, `Post`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = load_posts(&tmp.path().join("articles")).unwrap();
//!
//! let post = find_post(&manifest, "2023-09-01-hello-world");
//! assert_eq!(post.title, "Hello, World!");
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::types::Post;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write an article file into `dir`, creating the directory if needed.
pub fn write_article(dir: &Path, name: &str, content: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), content).unwrap();
}

// =========================================================================
// Manifest lookups: panic with a clear message on miss
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(manifest: &'a Manifest, slug: &str) -> &'a Post {
    manifest.posts.find(slug).unwrap_or_else(|| {
        let slugs = post_slugs(manifest);
        panic!("post '{slug}' not found. Available: {slugs:?}")
    })
}

/// All post slugs in collection order (newest first).
pub fn post_slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.posts.iter().map(|p| p.slug.as_str()).collect()
}

// =========================================================================
// Log capture
// =========================================================================

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return its result together
/// with every `WARN` line it logged (ANSI colors off).
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    let lines = String::from_utf8(bytes)
        .unwrap()
        .lines()
        .filter(|l| l.contains("WARN"))
        .map(str::to_string)
        .collect();
    (result, lines)
}
