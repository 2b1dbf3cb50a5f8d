//! SoundFont file cache shared by all engines of a backend.

use crate::error::{Error, Result};
use dashmap::DashMap;
use rustysynth::SoundFont;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parsed SoundFonts keyed by path.
///
/// A file is parsed once; engines share the immutable sample data through
/// `Arc`. Entries no engine references any more can be dropped with
/// [`purge_unused`](Self::purge_unused).
#[derive(Default)]
pub struct SoundFontCache {
    soundfonts: DashMap<PathBuf, Arc<SoundFont>>,
}

impl SoundFontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a SoundFont from file or return the cached copy.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<SoundFont>> {
        let path = path.as_ref().to_path_buf();

        if let Some(soundfont) = self.soundfonts.get(&path) {
            return Ok(Arc::clone(soundfont.value()));
        }

        // Parse outside the map so other paths stay available meanwhile
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);
        let soundfont = Arc::new(SoundFont::new(&mut reader).map_err(|e| {
            Error::SoundFont(format!(
                "Failed to parse SoundFont file '{}': {}",
                path.display(),
                e
            ))
        })?);

        // A concurrent load of the same path may have won; keep the first copy
        let entry = self.soundfonts.entry(path).or_insert(soundfont);
        Ok(Arc::clone(entry.value()))
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.soundfonts.contains_key(path.as_ref())
    }

    /// Drop cached SoundFonts that no engine holds. Returns how many were dropped.
    pub fn purge_unused(&self) -> usize {
        let before = self.soundfonts.len();
        self.soundfonts
            .retain(|_, soundfont| Arc::strong_count(soundfont) > 1);
        before - self.soundfonts.len()
    }

    /// Get the number of cached SoundFonts
    pub fn len(&self) -> usize {
        self.soundfonts.len()
    }

    /// Check if no SoundFonts are cached
    pub fn is_empty(&self) -> bool {
        self.soundfonts.is_empty()
    }
}
