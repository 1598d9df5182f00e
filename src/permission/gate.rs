use std::sync::mpsc::Sender;

use tracing::{debug, info, warn};

use crate::notice::{Notice, emit};

use super::policy::{Capability, Platform, plan_for};

/// Whether storage may be read, as last decided by the gate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

/// Answer from the platform for one capability request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GrantResult {
    Granted,
    Denied,
    /// The capability does not exist on this device, so it cannot be asked for.
    Unavailable,
}

/// The request call itself failed (as opposed to the user saying no).
#[derive(Debug, thiserror::Error)]
#[error("capability request failed: {0}")]
pub struct RequestError(pub String);

/// Boundary to the OS permission dialogs.
pub trait CapabilityRequester {
    fn request(&mut self, capability: Capability) -> Result<GrantResult, RequestError>;
}

impl<F> CapabilityRequester for F
where
    F: FnMut(Capability) -> Result<GrantResult, RequestError>,
{
    fn request(&mut self, capability: Capability) -> Result<GrantResult, RequestError> {
        self(capability)
    }
}

/// Resolves storage access for a platform and reports terminal denials.
pub struct PermissionGate<R> {
    requester: R,
    notices: Sender<Notice>,
}

impl<R: CapabilityRequester> PermissionGate<R> {
    pub fn new(requester: R, notices: Sender<Notice>) -> Self {
        Self { requester, notices }
    }

    pub fn requester(&self) -> &R {
        &self.requester
    }

    /// Run the request plan for `platform` and map the answers to a state.
    ///
    /// A terminal denial emits one `Notice::PermissionDenied`. Nothing is
    /// retried automatically; call `resolve` again when the user asks.
    pub fn resolve(&mut self, platform: Platform) -> PermissionState {
        let plan = plan_for(platform);
        info!(
            "requesting {} for {:?} {}",
            plan.primary.as_str(),
            platform.family,
            platform.version
        );

        let answer = self.ask(plan.primary);
        if answer == GrantResult::Granted {
            return PermissionState::Granted;
        }

        let refused = match plan.fallback {
            Some(fallback) => {
                debug!(
                    "{} answered {answer:?}, falling back to {}",
                    plan.primary.as_str(),
                    fallback.as_str()
                );
                if self.ask(fallback) == GrantResult::Granted {
                    return PermissionState::Granted;
                }
                fallback
            }
            None => plan.primary,
        };

        warn!("storage permission denied ({})", refused.as_str());
        emit(
            &self.notices,
            Notice::PermissionDenied {
                capability: refused,
            },
        );
        PermissionState::Denied
    }

    fn ask(&mut self, capability: Capability) -> GrantResult {
        match self.requester.request(capability) {
            Ok(answer) => answer,
            Err(err) => {
                warn!("{} request failed, treating as denied: {err}", capability.as_str());
                GrantResult::Denied
            }
        }
    }
}
