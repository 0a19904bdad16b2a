//! Directory traversal.
//!
//! # Overview
//!
//! [`Walker`] descends recursively from one root using [`walkdir`], in file
//! name order, without following symbolic links into directories. Every
//! non-directory entry is reported as [`Discovered::File`] (a regular file,
//! or a symlink whose target is one) or [`Discovered::Skipped`] (sockets,
//! FIFOs, devices, links to directories). Traversal errors are yielded as
//! [`ScanError`] values and iteration continues with the next sibling.
//!
//! [`list_immediate`] is the non-recursive counterpart used by `fic update`.
//!
//! # Example
//!
//! ```no_run
//! use fic::scanner::{Discovered, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/etc"));
//! for item in walker.walk() {
//!     match item {
//!         Ok(Discovered::File(path)) => println!("{}", path.display()),
//!         Ok(Discovered::Skipped(_)) => {}
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::fs::{self, FileType};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::ScanError;

/// A non-directory entry found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovered {
    /// Hashable: a regular file, or a symlink resolving to one.
    File(PathBuf),
    /// Present but not a regular file; never opened.
    Skipped(PathBuf),
}

impl Discovered {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Skipped(path) => path,
        }
    }
}

/// Recursive walker over a single root.
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
}

impl Walker {
    /// Create a walker for the given root.
    ///
    /// The root may also be a single file, which is then the only entry.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Walk the tree, yielding every non-directory entry.
    ///
    /// Returned paths are `root.join(relative)`, so they keep whatever form
    /// (absolute or relative) the root was configured with.
    pub fn walk(&self) -> impl Iterator<Item = Result<Discovered, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }
                    Some(classify(entry.into_path(), file_type))
                }
                Err(e) => Some(Err(self.convert_error(e))),
            })
    }

    /// Convert a walkdir error into a [`ScanError`] for the offending path.
    fn convert_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if error.loop_ancestor().is_some() {
            return ScanError::Io {
                path,
                source: std::io::Error::other(error.to_string()),
            };
        }

        match error.into_io_error() {
            Some(source) => ScanError::from_io(path, source),
            None => ScanError::Io {
                path,
                source: std::io::Error::other("directory traversal failed"),
            },
        }
    }
}

/// List the immediate entries of `root` without descending.
///
/// Sub-directories are reported as [`Discovered::Skipped`]. If `root` is
/// itself a file, it is the single entry. Per-entry failures are returned in
/// place so the caller can log them and keep going.
///
/// # Errors
///
/// Returns an error if `root` does not exist or cannot be read at all.
pub fn list_immediate(root: &Path) -> Result<Vec<Result<Discovered, ScanError>>, ScanError> {
    let metadata = fs::symlink_metadata(root).map_err(|e| ScanError::from_io(root.into(), e))?;
    if !metadata.is_dir() {
        // A symlinked root directory still gets listed.
        if metadata.file_type().is_symlink() && root.is_dir() {
            return read_immediate(root);
        }
        return Ok(vec![classify(root.to_path_buf(), metadata.file_type())]);
    }
    read_immediate(root)
}

fn read_immediate(root: &Path) -> Result<Vec<Result<Discovered, ScanError>>, ScanError> {
    let reader = fs::read_dir(root).map_err(|e| ScanError::from_io(root.into(), e))?;

    let mut items: Vec<Result<Discovered, ScanError>> = reader
        .map(|entry| {
            let entry = entry.map_err(|e| ScanError::from_io(root.into(), e))?;
            let path = entry.path();
            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => Ok(Discovered::Skipped(path)),
                Ok(file_type) => classify(path, file_type),
                Err(e) => Err(ScanError::from_io(path, e)),
            }
        })
        .collect();

    items.sort_by(|a, b| match (a, b) {
        (Ok(a), Ok(b)) => a.path().cmp(b.path()),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => std::cmp::Ordering::Equal,
    });
    Ok(items)
}

/// Decide whether a non-directory entry is hashable.
fn classify(path: PathBuf, file_type: FileType) -> Result<Discovered, ScanError> {
    if file_type.is_file() {
        return Ok(Discovered::File(path));
    }
    if file_type.is_symlink() {
        return match fs::metadata(&path) {
            Ok(target) if target.is_file() => Ok(Discovered::File(path)),
            Ok(_) => Ok(Discovered::Skipped(path)),
            // Dangling link: nothing to hash, and nothing wrong with the scan.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Discovered::Skipped(path)),
            Err(e) => Err(ScanError::from_io(path, e)),
        };
    }
    Ok(Discovered::Skipped(path))
}
