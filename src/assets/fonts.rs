//! Explicit, memoized font cache.
//!
//! One cache is created per process or session and shared (via `Arc`) by every engine that needs
//! text. Lookups are load-once: the first resolution of a `(family, weight, italic)` triple is
//! memoized, including misses that fell back to the default face.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, RwLock},
};

use crate::foundation::math::Fnv1a64;

/// A resolved font face: its bytes and face index inside them.
#[derive(Clone)]
pub struct ResolvedFont {
    /// Family name the face was registered under.
    pub family: String,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index within `bytes` (collections).
    pub index: u32,
    /// Stable key for downstream caches.
    pub key: u64,
    /// `true` when the requested family was missing and a default face was substituted.
    pub is_fallback: bool,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("family", &self.family)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("is_fallback", &self.is_fallback)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    weight: u16,
    italic: bool,
}

/// Font database plus memoized resolutions.
pub struct FontCache {
    db: RwLock<usvg::fontdb::Database>,
    resolved: Mutex<HashMap<FontKey, Option<ResolvedFont>>>,
}

impl Default for FontCache {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for FontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl FontCache {
    /// Cache without any fonts. Text still lays out with estimated metrics but draws nothing.
    pub fn empty() -> Self {
        Self {
            db: RwLock::new(usvg::fontdb::Database::new()),
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// Cache seeded with the platform's installed fonts.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self {
            db: RwLock::new(db),
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// Register every `.ttf`/`.otf`/`.ttc` file in `dir`. Unreadable files are skipped.
    pub fn load_dir(&self, dir: &Path) {
        let Ok(rd) = std::fs::read_dir(dir) else {
            return;
        };

        let mut db = self.db.write().unwrap_or_else(|e| e.into_inner());
        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            if let Err(err) = db.load_font_file(&path) {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable font file");
            }
        }
        drop(db);
        self.invalidate();
    }

    /// Register font bytes (e.g. a web font fetched by the caller).
    ///
    /// Returns the family names found in the data; empty when the bytes are not a font.
    pub fn register_bytes(&self, bytes: Vec<u8>) -> Vec<String> {
        let mut db = self.db.write().unwrap_or_else(|e| e.into_inner());
        let before = db.len();
        db.load_font_data(bytes);
        let families = db
            .faces()
            .skip(before)
            .filter_map(|f| f.families.first().map(|(name, _)| name.clone()))
            .collect::<Vec<_>>();
        drop(db);
        self.invalidate();
        families
    }

    /// Number of registered faces.
    pub fn face_count(&self) -> usize {
        self.db.read().map(|db| db.len()).unwrap_or(0)
    }

    /// Return `true` when `family` is registered (exact, case-insensitive name match).
    pub fn has_family(&self, family: &str) -> bool {
        let Ok(db) = self.db.read() else {
            return false;
        };
        db.faces().any(|f| {
            f.families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(family))
        })
    }

    /// Resolve a face for `family`, falling back to sans-serif, then to any registered face.
    ///
    /// Returns `None` only when no fonts are registered at all.
    pub fn resolve(&self, family: &str, weight: u16, italic: bool) -> Option<ResolvedFont> {
        let key = FontKey {
            family: family.trim().to_string(),
            weight,
            italic,
        };
        let mut memo = self.resolved.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(hit) = memo.get(&key) {
            return hit.clone();
        }

        let resolved = self.resolve_uncached(&key);
        if let Some(font) = &resolved
            && font.is_fallback
        {
            tracing::warn!(
                requested = %key.family,
                fallback = %font.family,
                "font family unavailable, using default face"
            );
        }
        memo.insert(key, resolved.clone());
        resolved
    }

    fn resolve_uncached(&self, key: &FontKey) -> Option<ResolvedFont> {
        use usvg::fontdb::{Family, Query, Style, Weight};

        let db = self.db.read().unwrap_or_else(|e| e.into_inner());
        let style = if key.italic {
            Style::Italic
        } else {
            Style::Normal
        };

        let exact = Query {
            families: &[Family::Name(&key.family)],
            weight: Weight(key.weight),
            style,
            ..Query::default()
        };
        let fallback = Query {
            families: &[Family::SansSerif, Family::Serif],
            weight: Weight(key.weight),
            style,
            ..Query::default()
        };

        let (id, is_fallback) = match db.query(&exact) {
            Some(id) if face_matches_family(&db, id, &key.family) => (id, false),
            _ => match db.query(&fallback) {
                Some(id) => (id, true),
                None => (db.faces().next()?.id, true),
            },
        };

        let family = db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "unknown".to_string());
        let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;

        let mut hasher = Fnv1a64::new_default();
        hasher.write_bytes(family.as_bytes());
        hasher.write_u8(0);
        hasher.write_bytes(&index.to_le_bytes());
        hasher.write_bytes(&(bytes.len() as u64).to_le_bytes());
        hasher.write_bytes(&bytes[..bytes.len().min(4096)]);

        Some(ResolvedFont {
            family,
            bytes: Arc::new(bytes),
            index,
            key: hasher.finish(),
            is_fallback,
        })
    }

    fn invalidate(&self) {
        self.resolved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

fn face_matches_family(db: &usvg::fontdb::Database, id: usvg::fontdb::ID, family: &str) -> bool {
    db.face(id).is_some_and(|f| {
        f.families
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(family))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
