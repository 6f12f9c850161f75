use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode as assets_decode,
    foundation::{
        error::{PrintZoneError, PrintZoneResult},
        math::Fnv1a64,
    },
};

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Intrinsic width used for layout (differs from `width` for oversampled vector sources).
    pub logical_width: f64,
    /// Intrinsic height used for layout.
    pub logical_height: f64,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Read one premultiplied pixel; out-of-range coordinates are transparent.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.rgba8_premul[i],
            self.rgba8_premul[i + 1],
            self.rgba8_premul[i + 2],
            self.rgba8_premul[i + 3],
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Stable hashed identifier of an asset reference.
pub struct AssetId(pub(crate) u64);

impl AssetId {
    /// Derive the id of a reference string (URL, relative path or data URL).
    pub fn for_reference(reference: &str) -> Self {
        let mut hasher = Fnv1a64::new_default();
        hasher.write_u8(b'I');
        hasher.write_bytes(reference.trim().as_bytes());
        Self(hasher.finish())
    }

    /// Access raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Decoded images keyed by their reference.
///
/// The store never performs IO: inline `data:` URLs are decoded on demand, everything else must
/// be supplied through [`AssetStore::insert_bytes`] once the caller has fetched it.
#[derive(Clone, Debug, Default)]
pub struct AssetStore {
    images: HashMap<AssetId, PreparedImage>,
    failed: HashMap<AssetId, String>,
}

impl AssetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` and store them under `reference`.
    pub fn insert_bytes(&mut self, reference: &str, bytes: &[u8]) -> PrintZoneResult<&PreparedImage> {
        let id = AssetId::for_reference(reference);
        match assets_decode::decode_image(bytes) {
            Ok(img) => {
                self.failed.remove(&id);
                Ok(self.images.entry(id).insert_entry(img).into_mut())
            }
            Err(err) => {
                self.failed.insert(id, err.to_string());
                Err(err)
            }
        }
    }

    /// Record that loading `reference` failed so it is not requested again.
    pub fn mark_failed(&mut self, reference: &str, message: impl Into<String>) {
        self.failed
            .insert(AssetId::for_reference(reference), message.into());
    }

    /// Resolve an inline data URL into the store. Non-inline references are left untouched.
    ///
    /// Returns `Ok(true)` when the reference is available after the call.
    pub fn ensure_inline(&mut self, reference: &str) -> PrintZoneResult<bool> {
        if self.get(reference).is_some() {
            return Ok(true);
        }
        if !assets_decode::is_data_url(reference) {
            return Ok(false);
        }
        let bytes = match assets_decode::decode_data_url(reference) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.mark_failed(reference, err.to_string());
                return Err(err);
            }
        };
        self.insert_bytes(reference, &bytes)?;
        Ok(true)
    }

    /// Lookup a decoded image.
    pub fn get(&self, reference: &str) -> Option<&PreparedImage> {
        self.images.get(&AssetId::for_reference(reference))
    }

    /// Return `true` if a previous load of `reference` failed.
    pub fn has_failed(&self, reference: &str) -> bool {
        self.failed.contains_key(&AssetId::for_reference(reference))
    }

    /// Number of decoded images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Return `true` when nothing is decoded yet.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Reads asset references relative to a directory root.
///
/// Used by offline tooling; the interactive engine receives bytes from its caller instead.
#[derive(Clone, Debug)]
pub struct DirAssetReader {
    root: PathBuf,
}

impl DirAssetReader {
    /// Create a reader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Return root directory used when resolving relative references.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the bytes behind `reference` (data URL or root-relative path).
    pub fn read(&self, reference: &str) -> PrintZoneResult<Vec<u8>> {
        if assets_decode::is_data_url(reference) {
            return assets_decode::decode_data_url(reference);
        }
        let norm = normalize_rel_path(reference)?;
        let path = self.root.join(Path::new(&norm));
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(PrintZoneError::from)
    }
}

/// Normalize and validate root-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> PrintZoneResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(PrintZoneError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(PrintZoneError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PrintZoneError::validation(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(PrintZoneError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
