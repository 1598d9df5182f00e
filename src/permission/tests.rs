use std::collections::HashMap;
use std::sync::mpsc;

use super::*;
use crate::notice::Notice;

/// Answers from a fixed table and remembers what was asked.
struct Scripted {
    answers: HashMap<Capability, Result<GrantResult, String>>,
    asked: Vec<Capability>,
}

impl Scripted {
    fn new(answers: &[(Capability, Result<GrantResult, &str>)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(c, r)| (*c, (*r).map_err(|e| e.to_string())))
                .collect(),
            asked: Vec::new(),
        }
    }
}

impl CapabilityRequester for Scripted {
    fn request(&mut self, capability: Capability) -> Result<GrantResult, RequestError> {
        self.asked.push(capability);
        match self.answers.get(&capability) {
            Some(Ok(answer)) => Ok(*answer),
            Some(Err(msg)) => Err(RequestError(msg.clone())),
            None => Ok(GrantResult::Unavailable),
        }
    }
}

fn resolve(
    platform: Platform,
    answers: &[(Capability, Result<GrantResult, &str>)],
) -> (PermissionState, Vec<Capability>, Vec<Notice>) {
    let (tx, rx) = mpsc::channel();
    let mut gate = PermissionGate::new(Scripted::new(answers), tx);
    let state = gate.resolve(platform);
    let asked = gate.requester().asked.clone();
    drop(gate);
    (state, asked, rx.try_iter().collect())
}

#[test]
fn version_tiers_split_at_30_and_33() {
    assert_eq!(VersionTier::of(29), VersionTier::Legacy);
    assert_eq!(VersionTier::of(30), VersionTier::Scoped);
    assert_eq!(VersionTier::of(32), VersionTier::Scoped);
    assert_eq!(VersionTier::of(33), VersionTier::Granular);
    assert_eq!(VersionTier::of(35), VersionTier::Granular);
}

#[test]
fn plan_table_covers_every_tier() {
    assert_eq!(
        plan_for(Platform::android(34)),
        RequestPlan {
            primary: Capability::ReadMediaAudio,
            fallback: None
        }
    );
    assert_eq!(
        plan_for(Platform::android(31)),
        RequestPlan {
            primary: Capability::ManageExternalStorage,
            fallback: Some(Capability::ReadExternalStorage)
        }
    );
    assert_eq!(
        plan_for(Platform::android(28)),
        RequestPlan {
            primary: Capability::ReadExternalStorage,
            fallback: None
        }
    );
    // The version never matters outside the primary family.
    assert_eq!(plan_for(Platform::ios(12)), plan_for(Platform::ios(40)));
    assert_eq!(plan_for(Platform::ios(17)).primary, Capability::MediaLibrary);
}

#[test]
fn granular_tier_grants_read_media_audio() {
    let (state, asked, notices) = resolve(
        Platform::android(33),
        &[(Capability::ReadMediaAudio, Ok(GrantResult::Granted))],
    );
    assert_eq!(state, PermissionState::Granted);
    assert_eq!(asked, vec![Capability::ReadMediaAudio]);
    assert!(notices.is_empty());
}

#[test]
fn scoped_tier_falls_back_after_denial() {
    let (state, asked, notices) = resolve(
        Platform::android(30),
        &[
            (Capability::ManageExternalStorage, Ok(GrantResult::Denied)),
            (Capability::ReadExternalStorage, Ok(GrantResult::Granted)),
        ],
    );
    assert_eq!(state, PermissionState::Granted);
    assert_eq!(
        asked,
        vec![
            Capability::ManageExternalStorage,
            Capability::ReadExternalStorage
        ]
    );
    assert!(notices.is_empty());
}

#[test]
fn scoped_tier_falls_back_when_manage_is_unavailable_or_fails() {
    let (state, asked, _) = resolve(
        Platform::android(31),
        &[
            (Capability::ManageExternalStorage, Ok(GrantResult::Unavailable)),
            (Capability::ReadExternalStorage, Ok(GrantResult::Granted)),
        ],
    );
    assert_eq!(state, PermissionState::Granted);
    assert_eq!(asked.len(), 2);

    let (state, asked, _) = resolve(
        Platform::android(32),
        &[
            (Capability::ManageExternalStorage, Err("no such permission")),
            (Capability::ReadExternalStorage, Ok(GrantResult::Granted)),
        ],
    );
    assert_eq!(state, PermissionState::Granted);
    assert_eq!(asked.len(), 2);
}

#[test]
fn scoped_tier_denied_twice_notifies_once() {
    let (state, asked, notices) = resolve(
        Platform::android(31),
        &[
            (Capability::ManageExternalStorage, Ok(GrantResult::Denied)),
            (Capability::ReadExternalStorage, Ok(GrantResult::Denied)),
        ],
    );
    assert_eq!(state, PermissionState::Denied);
    assert_eq!(asked.len(), 2);
    assert_eq!(
        notices,
        vec![Notice::PermissionDenied {
            capability: Capability::ReadExternalStorage
        }]
    );
}

#[test]
fn legacy_tier_has_no_fallback() {
    let (state, asked, notices) = resolve(
        Platform::android(29),
        &[(Capability::ReadExternalStorage, Ok(GrantResult::Denied))],
    );
    assert_eq!(state, PermissionState::Denied);
    assert_eq!(asked, vec![Capability::ReadExternalStorage]);
    assert_eq!(notices.len(), 1);
}

#[test]
fn request_failure_is_a_denial_not_a_crash() {
    let (state, asked, notices) = resolve(
        Platform::ios(17),
        &[(Capability::MediaLibrary, Err("bridge exploded"))],
    );
    assert_eq!(state, PermissionState::Denied);
    assert_eq!(asked, vec![Capability::MediaLibrary]);
    assert_eq!(
        notices,
        vec![Notice::PermissionDenied {
            capability: Capability::MediaLibrary
        }]
    );
}

#[test]
fn closures_can_act_as_requesters() {
    let (tx, rx) = mpsc::channel();
    let requester = |capability: Capability| -> Result<GrantResult, RequestError> {
        if capability == Capability::ReadMediaAudio {
            Ok(GrantResult::Granted)
        } else {
            Ok(GrantResult::Denied)
        }
    };
    let mut gate = PermissionGate::new(requester, tx);
    assert!(gate.resolve(Platform::android(34)).is_granted());
    assert_eq!(gate.resolve(Platform::android(28)), PermissionState::Denied);
    assert_eq!(rx.try_iter().count(), 1);
}
