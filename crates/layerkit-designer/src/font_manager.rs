//! Process-wide font cache.
//!
//! Families are loaded at most once per process and never evicted. A failed
//! load is not cached, so the next request tries again.

use layerkit_core::{emit, AppEvent, FontError, FontEvent};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::{Mutex, OnceLock},
};

/// A font family and where to load it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSource {
    pub family: String,
    pub url: String,
}

impl FontSource {
    pub fn new(family: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            url: url.into(),
        }
    }
}

/// Loads one font face into whatever renders text.
pub trait FontLoader: Send + Sync {
    fn load(&self, family: &str, url: &str) -> Result<(), FontError>;
}

/// Loader for local font files, given as a path or a `file://` url.
///
/// Checks that the file exists and starts with a TrueType, OpenType or WOFF
/// signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFontLoader;

const FONT_SIGNATURES: [&[u8]; 5] = [b"\x00\x01\x00\x00", b"OTTO", b"true", b"wOFF", b"wOF2"];

impl FontLoader for FileFontLoader {
    fn load(&self, family: &str, url: &str) -> Result<(), FontError> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        if path.is_empty() || path.contains("://") {
            return Err(FontError::InvalidSource {
                family: family.to_string(),
                url: url.to_string(),
            });
        }
        let bytes = fs::read(Path::new(path)).map_err(|e| FontError::LoadFailed {
            family: family.to_string(),
            reason: e.to_string(),
        })?;
        if !FONT_SIGNATURES.iter().any(|sig| bytes.starts_with(sig)) {
            return Err(FontError::LoadFailed {
                family: family.to_string(),
                reason: "not a font file".to_string(),
            });
        }
        Ok(())
    }
}

/// Family name to loaded flag.
#[derive(Debug, Default)]
pub struct FontManager {
    cache: Mutex<HashMap<String, bool>>,
}

impl FontManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared instance.
    pub fn global() -> &'static FontManager {
        static MANAGER: OnceLock<FontManager> = OnceLock::new();
        MANAGER.get_or_init(FontManager::new)
    }

    pub fn is_loaded(&self, family: &str) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(family)
            .copied()
            .unwrap_or(false)
    }

    /// Make sure `family` is available.
    ///
    /// Returns `true` if it was already cached or loaded now. Failures are
    /// logged and reported as `false`.
    pub fn acquire_or_load(&self, family: &str, url: &str, loader: &dyn FontLoader) -> bool {
        if self.is_loaded(family) {
            return true;
        }

        // The lock is not held while loading; two racing loads of one family
        // both succeed and the second insert is a no-op.
        match loader.load(family, url) {
            Ok(()) => {
                self.cache
                    .lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .insert(family.to_string(), true);
                tracing::debug!("Loaded font {}", family);
                emit!(AppEvent::Font(FontEvent::Loaded {
                    family: family.to_string(),
                }));
                true
            }
            Err(e) => {
                tracing::error!("Failed to preload font {}: {}", family, e);
                emit!(AppEvent::Font(FontEvent::Failed {
                    family: family.to_string(),
                    reason: e.to_string(),
                }));
                false
            }
        }
    }

    /// Load every source. Returns how many are available afterwards.
    pub fn preload_all(&self, sources: &[FontSource], loader: &dyn FontLoader) -> usize {
        sources
            .iter()
            .filter(|s| self.acquire_or_load(&s.family, &s.url, loader))
            .count()
    }

    /// Cached families, sorted.
    pub fn loaded_families(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .cache
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .filter(|(_, loaded)| **loaded)
            .map(|(family, _)| family.clone())
            .collect();
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLoader {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FontLoader for CountingLoader {
        fn load(&self, family: &str, _url: &str) -> Result<(), FontError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(FontError::LoadFailed {
                    family: family.to_string(),
                    reason: "404".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_loads_once() {
        let fonts = FontManager::new();
        let loader = CountingLoader {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        assert!(fonts.acquire_or_load("Inter", "https://cdn/inter.woff2", &loader));
        assert!(fonts.acquire_or_load("Inter", "https://cdn/inter.woff2", &loader));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fonts.loaded_families(), vec!["Inter".to_string()]);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let fonts = FontManager::new();
        let loader = CountingLoader {
            calls: AtomicUsize::new(0),
            fail: true,
        };
        assert!(!fonts.acquire_or_load("Broken", "x", &loader));
        assert!(!fonts.acquire_or_load("Broken", "x", &loader));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
        assert!(!fonts.is_loaded("Broken"));
    }

    #[test]
    fn test_file_loader_checks_signature() {
        let mut good = tempfile::NamedTempFile::new().unwrap();
        good.write_all(b"wOF2rest-of-font").unwrap();
        let mut bad = tempfile::NamedTempFile::new().unwrap();
        bad.write_all(b"<html>").unwrap();

        let url = format!("file://{}", good.path().display());
        assert!(FileFontLoader.load("Good", &url).is_ok());
        assert!(FileFontLoader.load("Bad", &bad.path().display().to_string()).is_err());
        assert!(matches!(
            FileFontLoader.load("Remote", "https://cdn/x.woff2"),
            Err(FontError::InvalidSource { .. })
        ));
    }

    #[test]
    fn test_preload_all_counts_available() {
        let fonts = FontManager::new();
        let ok = CountingLoader {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let sources = vec![FontSource::new("A", "a"), FontSource::new("B", "b")];
        assert_eq!(fonts.preload_all(&sources, &ok), 2);
    }
}
