use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::permission::PermissionState;

use super::model::{Catalog, CatalogEntry};
use super::naming::{ExtensionSet, display_name_of};
use super::roots::{ScanPass, ScanPlan, ScanRoot};

/// The only way a whole scan pass can fail.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("storage permission not granted (state: {0:?})")]
    PermissionNotGranted(PermissionState),
}

/// A root or subtree that could not be read. Logged and skipped, never fatal.
#[derive(Debug, thiserror::Error)]
#[error("failed to read {}: {source}", .path.display())]
pub struct ScanIoError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl ScanIoError {
    fn walk(root: &Path, source: walkdir::Error) -> Self {
        let path = source
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        Self {
            path,
            source: source.into(),
        }
    }

    fn root(root: &Path, source: io::Error) -> Self {
        Self {
            path: root.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory descents allowed below each root; files in a directory at
    /// exactly this depth are still collected.
    pub max_depth: usize,
    pub follow_links: bool,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub catalog: Catalog,
    pub io_errors: Vec<ScanIoError>,
    /// Roots that existed and were walked.
    pub roots_visited: usize,
    pub fallback_used: bool,
}

#[derive(Default)]
struct Walk {
    entries: Vec<CatalogEntry>,
    errors: Vec<ScanIoError>,
    roots_visited: usize,
}

impl Walk {
    fn absorb(&mut self, other: Walk) {
        self.entries.extend(other.entries);
        self.errors.extend(other.errors);
        self.roots_visited += other.roots_visited;
    }
}

fn ensure_granted(permission: PermissionState) -> Result<(), ScanError> {
    if permission.is_granted() {
        Ok(())
    } else {
        Err(ScanError::PermissionNotGranted(permission))
    }
}

/// Walk `roots` in order and collect the matching audio files.
///
/// Missing roots are skipped silently; unreadable subtrees are logged,
/// recorded in the report and contribute nothing.
pub fn scan(
    permission: PermissionState,
    roots: &[ScanRoot],
    extensions: &ExtensionSet,
    options: ScanOptions,
) -> Result<ScanReport, ScanError> {
    ensure_granted(permission)?;

    let walk = walk_roots(roots, extensions, options);
    Ok(ScanReport {
        catalog: Catalog::from_entries(walk.entries),
        io_errors: walk.errors,
        roots_visited: walk.roots_visited,
        fallback_used: false,
    })
}

/// Run the primary pass of `plan`, and its fallback pass once if the primary found nothing.
pub fn scan_plan(
    permission: PermissionState,
    plan: &ScanPlan,
    extensions: &ExtensionSet,
    follow_links: bool,
) -> Result<ScanReport, ScanError> {
    ensure_granted(permission)?;
    let started = Instant::now();

    let mut walk = walk_pass(&plan.primary, extensions, follow_links);
    let mut fallback_used = false;

    if walk.entries.is_empty() {
        if let Some(fallback) = &plan.fallback {
            info!(
                "primary roots yielded no audio, probing {} fallback folders",
                fallback.roots.len()
            );
            walk.absorb(walk_pass(fallback, extensions, follow_links));
            fallback_used = true;
        }
    }

    let catalog = Catalog::from_entries(walk.entries);
    info!(
        "scan finished: {} tracks from {} roots ({} unreadable paths) in {:?}",
        catalog.len(),
        walk.roots_visited,
        walk.errors.len(),
        started.elapsed()
    );

    Ok(ScanReport {
        catalog,
        io_errors: walk.errors,
        roots_visited: walk.roots_visited,
        fallback_used,
    })
}

fn walk_pass(pass: &ScanPass, extensions: &ExtensionSet, follow_links: bool) -> Walk {
    walk_roots(
        &pass.roots,
        extensions,
        ScanOptions {
            max_depth: pass.max_depth,
            follow_links,
        },
    )
}

// Roots are independent, so they are walked in parallel; `collect` keeps root
// order, which decides the first-seen winner during dedup.
fn walk_roots(roots: &[ScanRoot], extensions: &ExtensionSet, options: ScanOptions) -> Walk {
    roots
        .par_iter()
        .map(|root| walk_root(root.path(), extensions, options))
        .collect::<Vec<_>>()
        .into_iter()
        .fold(Walk::default(), |mut acc, w| {
            acc.absorb(w);
            acc
        })
}

fn walk_root(root: &Path, extensions: &ExtensionSet, options: ScanOptions) -> Walk {
    let root = match std::path::absolute(root) {
        Ok(p) => p,
        Err(err) => {
            warn!("cannot resolve scan root {}: {err}", root.display());
            return Walk::default();
        }
    };
    match root.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            debug!("skipping missing root {}", root.display());
            return Walk::default();
        }
        Err(err) => {
            warn!("skipping inaccessible root {}: {err}", root.display());
            return Walk {
                errors: vec![ScanIoError::root(&root, err)],
                ..Walk::default()
            };
        }
    }

    let mut walk = Walk {
        roots_visited: 1,
        ..Walk::default()
    };

    // WalkDir counts the root as depth 0 and its children as 1, so a directory
    // `max_depth` descents down holds files at depth `max_depth + 1`.
    let walker = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(options.max_depth.saturating_add(1))
        .follow_links(options.follow_links)
        .sort_by_file_name();

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable path under {}: {err}", root.display());
                walk.errors.push(ScanIoError::walk(&root, err));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let Some(extension) = extensions.matching(&name) else {
            continue;
        };

        let size_bytes = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!("skipping {}: {err}", entry.path().display());
                walk.errors.push(ScanIoError::walk(&root, err));
                continue;
            }
        };

        let path = entry.path().to_path_buf();
        let id = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        walk.entries.push(CatalogEntry {
            id,
            display_name: display_name_of(&name).to_string(),
            path,
            size_bytes,
            extension,
        });
    }

    debug!(
        "{}: {} tracks, {} errors",
        root.display(),
        walk.entries.len(),
        walk.errors.len()
    );
    walk
}
