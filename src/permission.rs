//! Storage permission gate.
//!
//! `policy` holds the `(family, tier)` decision table that picks which
//! capability to request; `gate` runs that plan against the platform and
//! turns the answers into a `PermissionState`.

mod gate;
mod policy;

pub use gate::*;
pub use policy::*;

#[cfg(test)]
mod tests;
