use std::collections::BTreeSet;

/// Lowercase extension of `name`: everything from the final `.` on.
///
/// Names without a dot have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    name.rfind('.').map(|i| name[i..].to_lowercase())
}

/// Strip a trailing `.` + non-dot run from `name`.
///
/// `"a.b.mp3"` becomes `"a.b"`; a trailing bare dot is kept because no
/// extension characters follow it.
pub fn display_name_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i + 1 < name.len() => &name[..i],
        _ => name,
    }
}

/// Normalised allow-list of audio extensions (lowercase, leading dot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            extensions
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .map(|e| format!(".{e}"))
                .collect(),
        )
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.0.contains(extension)
    }

    /// The extension of `name` when it is on the allow-list.
    pub fn matching(&self, name: &str) -> Option<String> {
        extension_of(name).filter(|ext| self.contains(ext))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new([".mp3", ".m4a", ".wav", ".flac", ".aac", ".ogg"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_and_keeps_the_dot() {
        assert_eq!(extension_of("Song.MP3").as_deref(), Some(".mp3"));
        assert_eq!(extension_of("a.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of(".ogg").as_deref(), Some(".ogg"));
    }

    #[test]
    fn display_name_strips_only_the_last_extension() {
        assert_eq!(display_name_of("Song.mp3"), "Song");
        assert_eq!(display_name_of("a.b.flac"), "a.b");
        assert_eq!(display_name_of("noext"), "noext");
        assert_eq!(display_name_of("trailing."), "trailing.");
        assert_eq!(display_name_of(".ogg"), "");
        assert_eq!(display_name_of("Live 1.0 (remix).ogg"), "Live 1.0 (remix)");
    }

    #[test]
    fn extension_set_normalises_configured_values() {
        let set = ExtensionSet::new(["mp3", " .FLAC ", "", "."]);
        assert!(set.contains(".mp3"));
        assert!(set.contains(".flac"));
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn default_set_matches_case_insensitively() {
        let set = ExtensionSet::default();
        for name in ["a.mp3", "a.M4A", "a.wav", "a.Flac", "a.aac", "a.OGG"] {
            assert!(set.matching(name).is_some(), "{name} should match");
        }
        for name in ["a.txt", "a.mp4", "a", "a.opus"] {
            assert!(set.matching(name).is_none(), "{name} should not match");
        }
    }
}
