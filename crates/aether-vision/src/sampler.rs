//! Collection scanning and random sampling.
//!
//! A collection is a single directory of images (no recursion). One scan
//! yields both the qualifying file list and the [`CollectionSignature`]
//! the theme cache uses for invalidation, so the two never disagree.

use std::path::{Path, PathBuf};

use aether_models::CollectionSignature;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{VisionError, VisionResult};
use crate::formats::is_supported_path;

/// Default per-file size ceiling (100 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// Filters applied while scanning.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Files larger than this are skipped.
    pub max_file_bytes: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Result of scanning one collection directory.
#[derive(Debug, Clone)]
pub struct CollectionScan {
    /// Canonical collection directory.
    pub root: PathBuf,
    /// Qualifying images, sorted by path.
    pub files: Vec<PathBuf>,
    pub signature: CollectionSignature,
}

impl CollectionScan {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Uniform random subset of at most `max_count` files, in random order.
    pub fn sample(&self, max_count: usize) -> VisionResult<Vec<PathBuf>> {
        self.sample_with(max_count, &mut rand::rng())
    }

    pub fn sample_with<R: Rng + ?Sized>(&self, max_count: usize, rng: &mut R) -> VisionResult<Vec<PathBuf>> {
        if self.files.is_empty() {
            return Err(VisionError::EmptyCollection(self.root.clone()));
        }

        let mut picked = self.files.clone();
        picked.shuffle(rng);
        picked.truncate(max_count.max(1));
        Ok(picked)
    }
}

/// List the qualifying images of `dir` and compute its signature.
///
/// Qualifying means a regular file (or a link to one) with a supported extension and a size in
/// `1..=max_file_bytes`. An existing directory with no qualifying files is
/// not an error here; sampling it is.
pub fn scan_collection(dir: impl AsRef<Path>, config: &SamplerConfig) -> VisionResult<CollectionScan> {
    let dir = dir.as_ref();
    let root = match std::fs::canonicalize(dir) {
        Ok(root) if root.is_dir() => root,
        _ => return Err(VisionError::CollectionNotFound(dir.to_path_buf())),
    };

    let mut files = Vec::new();
    let mut latest_modified_ms = 0i64;

    for entry in std::fs::read_dir(&root)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %root.display(), error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !is_supported_path(&path) {
            continue;
        }

        // Follows symlinks, so linked images count like regular files.
        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping file without metadata");
                continue;
            }
        };

        let size = metadata.len();
        if size == 0 || size > config.max_file_bytes {
            debug!(path = %path.display(), size, "Skipping file outside size limits");
            continue;
        }

        if let Ok(modified) = metadata.modified() {
            latest_modified_ms = latest_modified_ms.max(DateTime::<Utc>::from(modified).timestamp_millis());
        }
        files.push(path);
    }

    files.sort();
    let signature = CollectionSignature {
        file_count: files.len() as u64,
        latest_modified_ms,
    };

    debug!(dir = %root.display(), files = files.len(), signature = %signature, "Scanned collection");

    Ok(CollectionScan { root, files, signature })
}

/// Scan `dir` with default filters and draw a random sample of at most `max_count` images.
pub fn sample(dir: impl AsRef<Path>, max_count: usize) -> VisionResult<Vec<PathBuf>> {
    scan_collection(dir, &SamplerConfig::default())?.sample(max_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn touch(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_scan_filters_extension_and_size() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.png", b"x");
        touch(dir.path(), "b.JPG", b"xx");
        touch(dir.path(), "empty.png", b"");
        touch(dir.path(), "readme.md", b"text");
        touch(dir.path(), "big.gif", &[0u8; 64]);
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let config = SamplerConfig { max_file_bytes: 32 };
        let scan = scan_collection(dir.path(), &config).unwrap();

        let names: Vec<_> = scan
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.JPG"]);
        assert_eq!(scan.signature.file_count, 2);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            scan_collection(&missing, &SamplerConfig::default()),
            Err(VisionError::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_empty_collection_cannot_be_sampled() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "notes.txt", b"hi");
        assert!(matches!(sample(dir.path(), 5), Err(VisionError::EmptyCollection(_))));
    }

    #[test]
    fn test_sample_is_bounded_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..20 {
            touch(dir.path(), &format!("img_{i:02}.png"), b"px");
        }
        let scan = scan_collection(dir.path(), &SamplerConfig::default()).unwrap();

        let picked = scan.sample(5).unwrap();
        assert_eq!(picked.len(), 5);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 5);
        assert!(picked.iter().all(|p| scan.files.contains(p)));

        // fewer files than requested returns all of them
        assert_eq!(scan.sample(50).unwrap().len(), 20);
    }

    #[test]
    fn test_sample_order_varies_with_rng() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..10 {
            touch(dir.path(), &format!("{i}.png"), b"px");
        }
        let scan = scan_collection(dir.path(), &SamplerConfig::default()).unwrap();

        let a = scan.sample_with(10, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = scan.sample_with(10, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_ne!(a, b);
        assert_eq!(
            a.iter().collect::<HashSet<_>>(),
            b.iter().collect::<HashSet<_>>()
        );
    }

    #[test]
    fn test_signature_is_stable_and_tracks_additions() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "one.png", b"1");
        touch(dir.path(), "two.png", b"2");

        let config = SamplerConfig::default();
        let first = scan_collection(dir.path(), &config).unwrap().signature;
        let again = scan_collection(dir.path(), &config).unwrap().signature;
        assert_eq!(first, again);

        touch(dir.path(), "three.png", b"3");
        let changed = scan_collection(dir.path(), &config).unwrap().signature;
        assert_ne!(first, changed);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_images_are_scanned() {
        let originals = tempfile::tempdir().unwrap();
        let target = touch(originals.path(), "real.png", b"px");

        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.png")).unwrap();
        std::os::unix::fs::symlink(originals.path().join("gone.png"), dir.path().join("dangling.png")).unwrap();

        let scan = scan_collection(dir.path(), &SamplerConfig::default()).unwrap();
        assert_eq!(scan.files, vec![scan.root.join("link.png")]);
        assert_eq!(scan.signature.file_count, 1);
        assert_eq!(sample(dir.path(), 5).unwrap().len(), 1);
    }
}
