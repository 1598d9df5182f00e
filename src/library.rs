//! Music discovery: turn a set of storage roots into a deduplicated catalog.
//!
//! `scan` is a pure function of the permission state, the roots, the
//! extension allow-list and the depth bound. `catalog::Library` wires it to
//! the permission gate and publishes the result for the view layer.

mod catalog;
mod model;
mod naming;
mod roots;
mod scan;

pub use catalog::{CatalogHandle, CatalogState, Library, RefreshOutcome};
pub use model::{Catalog, CatalogEntry};
pub use naming::{ExtensionSet, display_name_of, extension_of};
pub use roots::{FALLBACK_FOLDERS, ScanPass, ScanPlan, ScanRoot};
pub use scan::{ScanError, ScanIoError, ScanOptions, ScanReport, scan, scan_plan};
