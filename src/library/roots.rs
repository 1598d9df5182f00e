//! Which directories a scan pass visits on each platform.

use std::path::{Path, PathBuf};

use crate::config::{LibrarySettings, StorageSettings};
use crate::permission::{Platform, PlatformFamily, VersionTier};

/// Well-known folders probed under the canonical root when the primary pass finds nothing.
pub const FALLBACK_FOLDERS: [&str; 5] = ["Music", "Download", "Downloads", "AudioBooks", "Podcasts"];

/// A directory to traverse. It may not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRoot(PathBuf);

impl ScanRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for ScanRoot {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&Path> for ScanRoot {
    fn from(path: &Path) -> Self {
        Self(path.to_path_buf())
    }
}

/// An ordered root list walked with one depth bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPass {
    pub roots: Vec<ScanRoot>,
    pub max_depth: usize,
}

/// Primary pass plus the optional fallback pass for one platform tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    pub primary: ScanPass,
    pub fallback: Option<ScanPass>,
}

impl ScanPlan {
    pub fn for_platform(
        platform: Platform,
        library: &LibrarySettings,
        storage: &StorageSettings,
    ) -> Self {
        let scoped = platform.family == PlatformFamily::Android
            && platform.tier() != VersionTier::Legacy;

        let ext = &storage.external_storage;
        let mut roots: Vec<ScanRoot> = vec![
            ext.join("Music").into(),
            ext.join("Download").into(),
            ext.join("Downloads").into(),
            storage.documents.as_path().into(),
        ];

        let fallback = if scoped {
            if let Some(app) = &storage.app_external {
                roots.push(app.as_path().into());
            }
            let canonical = &storage.canonical_root;
            roots.extend(
                ["Music", "Download", "Downloads"]
                    .iter()
                    .map(|f| ScanRoot::from(canonical.join(f))),
            );

            Some(ScanPass {
                roots: FALLBACK_FOLDERS
                    .iter()
                    .map(|f| ScanRoot::from(canonical.join(f)))
                    .collect(),
                max_depth: library.fallback_max_depth,
            })
        } else {
            None
        };

        Self {
            primary: ScanPass {
                roots,
                max_depth: library.max_depth,
            },
            fallback,
        }
    }
}
