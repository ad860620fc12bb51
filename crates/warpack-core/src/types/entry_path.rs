//! Validated archive-relative entry path.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// An archive entry name that is safe to join onto the staging directory.
///
/// `EntryPath` represents a name that has been validated to not contain:
/// - Parent directory traversal (`..`)
/// - Null bytes
/// - Absolute roots or Windows drive prefixes
///
/// `.` components and repeated separators are normalized away. A name made
/// only of such components is rejected as well, since it would address the
/// staging root itself.
///
/// # Examples
///
/// ```
/// use warpack_core::EntryPath;
///
/// let path = EntryPath::parse("./WEB-INF//web.xml").unwrap();
/// assert_eq!(path.as_path(), std::path::Path::new("WEB-INF/web.xml"));
///
/// assert!(EntryPath::parse("../etc/passwd").is_none());
/// assert!(EntryPath::parse("/etc/passwd").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryPath(PathBuf);

impl EntryPath {
    /// Parses a raw, forward-slash archive entry name.
    ///
    /// Returns `None` if the name could escape the directory it is joined
    /// onto.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if name.contains('\0') || name.starts_with(['/', '\\']) {
            return None;
        }

        let mut normalized = PathBuf::new();
        // Entry names use '/', but some writers emit '\' on Windows
        for part in name.split(['/', '\\']) {
            let component = Path::new(part).components().next();
            match component {
                None | Some(Component::CurDir) => {}
                Some(Component::Normal(segment)) if segment == part => normalized.push(segment),
                Some(_) => return None,
            }
        }

        if normalized.as_os_str().is_empty() {
            return None;
        }
        Some(Self(normalized))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns the normalized name with `/` separators.
    ///
    /// Two raw names that address the same staged file share this form,
    /// e.g. `./META-INF//MANIFEST.MF` and `META-INF/MANIFEST.MF`.
    #[must_use]
    pub fn entry_name(&self) -> String {
        self.0
            .iter()
            .map(|segment| segment.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
