//! Which capability to ask for on which platform.

/// Operating system family the app is running on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    /// The primary family, with version-dependent storage rules.
    Android,
    /// Any other family; a single media library capability covers it.
    Ios,
}

/// The running platform: family plus OS API level / major version.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    pub family: PlatformFamily,
    pub version: u32,
}

impl Platform {
    pub fn android(api_level: u32) -> Self {
        Self {
            family: PlatformFamily::Android,
            version: api_level,
        }
    }

    pub fn ios(version: u32) -> Self {
        Self {
            family: PlatformFamily::Ios,
            version,
        }
    }

    pub fn tier(&self) -> VersionTier {
        VersionTier::of(self.version)
    }
}

/// Storage regimes of the primary family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VersionTier {
    /// Below API 30: plain external storage reads.
    Legacy,
    /// API 30 to 32: scoped storage, full access needs the manage capability.
    Scoped,
    /// API 33 and up: granular media capabilities.
    Granular,
}

impl VersionTier {
    pub fn of(version: u32) -> Self {
        match version {
            v if v >= 33 => VersionTier::Granular,
            v if v >= 30 => VersionTier::Scoped,
            _ => VersionTier::Legacy,
        }
    }
}

/// A platform capability the gate can ask the user for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    ReadMediaAudio,
    ManageExternalStorage,
    ReadExternalStorage,
    MediaLibrary,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ReadMediaAudio => "android.permission.READ_MEDIA_AUDIO",
            Capability::ManageExternalStorage => "android.permission.MANAGE_EXTERNAL_STORAGE",
            Capability::ReadExternalStorage => "android.permission.READ_EXTERNAL_STORAGE",
            Capability::MediaLibrary => "ios.permission.MEDIA_LIBRARY",
        }
    }
}

/// The request sequence for one gate invocation.
///
/// `fallback` is asked only when `primary` is denied, unavailable, or the
/// request for it fails outright.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestPlan {
    pub primary: Capability,
    pub fallback: Option<Capability>,
}

impl RequestPlan {
    const fn single(primary: Capability) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    const fn with_fallback(primary: Capability, fallback: Capability) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }
}

/// Decision table keyed by `(family, tier)`.
pub fn plan_for(platform: Platform) -> RequestPlan {
    match (platform.family, platform.tier()) {
        (PlatformFamily::Android, VersionTier::Granular) => {
            RequestPlan::single(Capability::ReadMediaAudio)
        }
        (PlatformFamily::Android, VersionTier::Scoped) => RequestPlan::with_fallback(
            Capability::ManageExternalStorage,
            Capability::ReadExternalStorage,
        ),
        (PlatformFamily::Android, VersionTier::Legacy) => {
            RequestPlan::single(Capability::ReadExternalStorage)
        }
        (PlatformFamily::Ios, _) => RequestPlan::single(Capability::MediaLibrary),
    }
}
