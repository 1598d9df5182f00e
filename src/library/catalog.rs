//! The catalog as the view layer sees it, and the controller that refreshes it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::config::Settings;
use crate::notice::{Notice, emit};
use crate::permission::{CapabilityRequester, PermissionGate, PermissionState, Platform};

use super::model::Catalog;
use super::naming::ExtensionSet;
use super::roots::ScanPlan;
use super::scan::{ScanError, ScanReport, scan_plan};

/// Runs one scan pass for the controller; `scan_plan` outside of tests.
pub(super) type ScanPassFn =
    fn(PermissionState, &ScanPlan, &ExtensionSet, bool) -> Result<ScanReport, ScanError>;

/// Read-only view for the UI. `catalog` is swapped whole at the end of a pass.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub catalog: Arc<Catalog>,
    pub loading: bool,
    pub has_permission: bool,
}

pub type CatalogHandle = Arc<Mutex<CatalogState>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The pass ran; `tracks` may be zero.
    Scanned { tracks: usize, fallback_used: bool },
    PermissionDenied,
    /// The pass broke off; the previous catalog was kept.
    Failed,
}

/// Owns the permission state and rebuilds the catalog on request.
///
/// Callers serialize `refresh` calls; there is no cancellation of a running pass.
pub struct Library<R> {
    gate: PermissionGate<R>,
    platform: Platform,
    plan: ScanPlan,
    extensions: ExtensionSet,
    follow_links: bool,
    permission: PermissionState,
    state: CatalogHandle,
    notices: Sender<Notice>,
    run_pass: ScanPassFn,
}

impl<R: CapabilityRequester> Library<R> {
    pub fn new(
        requester: R,
        platform: Platform,
        settings: &Settings,
        notices: Sender<Notice>,
    ) -> Self {
        Self {
            gate: PermissionGate::new(requester, notices.clone()),
            platform,
            plan: ScanPlan::for_platform(platform, &settings.library, &settings.storage),
            extensions: ExtensionSet::new(&settings.library.extensions),
            follow_links: settings.library.follow_links,
            permission: PermissionState::Unknown,
            state: Arc::new(Mutex::new(CatalogState::default())),
            notices,
            run_pass: scan_plan,
        }
    }

    /// Replace the platform-derived roots.
    pub fn with_plan(mut self, plan: ScanPlan) -> Self {
        self.plan = plan;
        self
    }

    #[cfg(test)]
    pub(super) fn set_scan_pass(&mut self, run_pass: ScanPassFn) {
        self.run_pass = run_pass;
    }

    pub fn catalog_handle(&self) -> CatalogHandle {
        self.state.clone()
    }

    pub fn snapshot(&self) -> CatalogState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn plan(&self) -> &ScanPlan {
        &self.plan
    }

    /// Ask the platform for storage access again.
    pub fn request_permission(&mut self) -> PermissionState {
        self.permission = self.gate.resolve(self.platform);
        let granted = self.permission.is_granted();
        self.update(|s| {
            s.has_permission = granted;
            if !granted {
                s.catalog = Arc::new(Catalog::default());
                s.loading = false;
            }
        });
        self.permission
    }

    /// Rescan when access is granted; otherwise run the gate first and scan on grant.
    pub fn refresh(&mut self) -> RefreshOutcome {
        if !self.permission.is_granted() && !self.request_permission().is_granted() {
            return RefreshOutcome::PermissionDenied;
        }
        self.rescan()
    }

    fn rescan(&mut self) -> RefreshOutcome {
        self.update(|s| s.loading = true);

        let permission = self.permission;
        let run_pass = self.run_pass;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            run_pass(permission, &self.plan, &self.extensions, self.follow_links)
        }));

        match result {
            Ok(Ok(report)) => {
                let tracks = report.catalog.len();
                let fallback_used = report.fallback_used;
                let catalog = Arc::new(report.catalog);
                self.update(|s| {
                    s.catalog = catalog;
                    s.loading = false;
                });
                RefreshOutcome::Scanned {
                    tracks,
                    fallback_used,
                }
            }
            Ok(Err(err)) => {
                warn!("scan skipped: {err}");
                self.update(|s| s.loading = false);
                RefreshOutcome::PermissionDenied
            }
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                warn!("scan pass aborted: {reason}");
                self.update(|s| s.loading = false);
                emit(&self.notices, Notice::ScanFailed { reason });
                RefreshOutcome::Failed
            }
        }
    }

    fn update(&self, f: impl FnOnce(&mut CatalogState)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
            debug!(
                "catalog: {} tracks, loading={}, permission={}",
                state.catalog.len(),
                state.loading,
                state.has_permission
            );
        }
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "scan worker panicked".to_string()
    }
}
