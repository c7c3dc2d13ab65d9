//! Rebuild-on-change loop.
//!
//! Watches the articles directory, the stylesheet and the config file, and
//! reruns [`build_site`] when any of them change. Rebuilds run one at a time
//! on the receiving side of the watcher channel.
//!
//! Debouncing is trailing-edge: after the first relevant event the loop waits
//! until the channel has been quiet for [`DEBOUNCE`], then builds once. An
//! editor that saves in several steps (truncate, then write) therefore gets a
//! single build of the finished file. Events that arrive while a build runs
//! stay queued and trigger one more rebuild afterwards.
//!
//! Files are watched through their parent directories. Editors that save by
//! writing a temp file and renaming it over the original would otherwise
//! detach a watch placed on the file itself.

use crate::{BuildError, BuildOptions, build_site, output};
use notify::{EventKind, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Quiet time required after the last event before a rebuild starts.
pub const DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("watcher error: {0}")]
    Notify(#[from] notify::Error),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("cannot resolve {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The set of paths whose changes trigger a rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchTargets {
    /// Any markdown file directly inside this directory counts.
    pub articles_dir: PathBuf,
    /// Individual files (config, stylesheet).
    pub files: Vec<PathBuf>,
}

impl WatchTargets {
    /// Resolve targets for `options` to absolute paths.
    ///
    /// The config and stylesheet need not exist yet; their parent
    /// directories must.
    pub fn resolve(options: &BuildOptions) -> Result<Self, WatchError> {
        let config = crate::config::load_config(&options.config_path()).map_err(BuildError::from)?;
        let articles_dir = canonical(&options.articles_dir(&config))?;
        let files: Vec<PathBuf> = [options.config_path(), options.stylesheet(&config)]
            .iter()
            .map(|f| canonical_file(f))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            articles_dir,
            files,
        })
    }

    /// Whether a change to `path` should trigger a rebuild.
    pub fn is_relevant(&self, path: &Path) -> bool {
        if path.parent() == Some(self.articles_dir.as_path()) && crate::is_markdown(path) {
            return true;
        }
        self.files.iter().any(|f| f == path)
    }

    /// Directories to hand to the watcher, deduplicated.
    fn directories(&self) -> BTreeSet<PathBuf> {
        let mut dirs = BTreeSet::from([self.articles_dir.clone()]);
        dirs.extend(self.files.iter().filter_map(|f| f.parent().map(Path::to_path_buf)));
        dirs
    }
}

fn canonical(path: &Path) -> Result<PathBuf, WatchError> {
    path.canonicalize().map_err(|source| WatchError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Canonicalize the parent of `file` and rejoin the file name, so files that
/// do not exist yet still resolve.
fn canonical_file(file: &Path) -> Result<PathBuf, WatchError> {
    let parent = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = file.file_name().unwrap_or(file.as_os_str());
    Ok(canonical(parent)?.join(name))
}

/// Only content-changing events count; access and metadata-only events don't.
fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Build once, then rebuild whenever a watched file changes.
///
/// The initial build must succeed. Errors in later rebuilds are printed and
/// the loop keeps watching. Returns when the watcher shuts down.
pub fn watch_and_rebuild(options: &BuildOptions) -> Result<(), WatchError> {
    let report = build_site(options)?;
    output::print_build_output(&report);

    let targets = WatchTargets::resolve(options)?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in targets.directories() {
        debug!(dir = %dir.display(), "watching");
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    }

    println!(
        "Watching {} for changes (Ctrl+C to stop)",
        targets.articles_dir.display()
    );

    loop {
        let event = match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => event,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        if !is_change(&event.kind) {
            continue;
        }
        let Some(changed) = event.paths.iter().find(|p| targets.is_relevant(p)) else {
            continue;
        };

        info!(path = %changed.display(), "changed, rebuilding");
        if !wait_until_quiet(&rx, DEBOUNCE) {
            break;
        }
        match build_site(options) {
            Ok(report) => output::print_build_output(&report),
            Err(e) => eprintln!("Build error: {e}"),
        }
    }

    Ok(())
}

/// Discard events until none has arrived for `quiet`.
///
/// Returns `false` if the sender side disconnected while waiting.
fn wait_until_quiet<T>(rx: &mpsc::Receiver<T>, quiet: Duration) -> bool {
    loop {
        match rx.recv_timeout(quiet) {
            Ok(_) => continue,
            Err(mpsc::RecvTimeoutError::Timeout) => return true,
            Err(mpsc::RecvTimeoutError::Disconnected) => return false,
        }
    }
}
