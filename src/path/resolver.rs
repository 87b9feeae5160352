//! Path string helpers
//!
//! Pure functions over path strings. Nothing here touches the filesystem and
//! `.`/`..` segments are left as they are. Callers holding an
//! `Option<&str>` get "absent in, absent out" through `Option::map`.

use std::path::{MAIN_SEPARATOR, Path};

/// Marks the start of an extension
pub const EXTENSION_SEPARATOR: char = '.';

/// Positions of the last separator and the last extension dot
#[derive(Debug, Clone, Copy)]
struct Anchors {
    separator: Option<usize>,
    dot: Option<usize>,
}

impl Anchors {
    fn of(path: &str) -> Self {
        Self {
            separator: path.rfind(MAIN_SEPARATOR),
            dot: path.rfind(EXTENSION_SEPARATOR),
        }
    }

    /// Start of the last path segment
    fn name_start(&self) -> usize {
        self.separator.map_or(0, |i| i + MAIN_SEPARATOR.len_utf8())
    }

    /// The dot only counts when it sits after the last separator
    fn extension_dot(&self) -> Option<usize> {
        match (self.separator, self.dot) {
            (_, None) => None,
            (None, Some(dot)) => Some(dot),
            (Some(sep), Some(dot)) if sep < dot => Some(dot),
            _ => None,
        }
    }
}

/// File name including its extension.
///
/// ```text
/// file_name("")                        = ""
/// file_name("   ")                     = "   "
/// file_name("a.b.rmvb")                = "a.b.rmvb"
/// file_name("/home/admin")             = "admin"
/// file_name("/home/admin/a.txt/b.mp3") = "b.mp3"
/// ```
pub fn file_name(path: &str) -> &str {
    &path[Anchors::of(path).name_start()..]
}

/// File name without its extension.
///
/// ```text
/// file_name_without_extension("")                        = ""
/// file_name_without_extension("a.mp3")                   = "a"
/// file_name_without_extension("a.b.rmvb")                = "a.b"
/// file_name_without_extension("/home/")                  = ""
/// file_name_without_extension("/home/admin/a.txt/b")     = "b"
/// file_name_without_extension("/home/admin/a.txt/b.mp3") = "b"
/// ```
pub fn file_name_without_extension(path: &str) -> &str {
    let anchors = Anchors::of(path);
    let start = anchors.name_start();
    let end = anchors.extension_dot().unwrap_or(path.len());
    &path[start..end]
}

/// Everything before the last separator, or `""` when there is none.
///
/// ```text
/// folder_name("a.mp3")                   = ""
/// folder_name("/home/admin")             = "/home"
/// folder_name("/home/admin/a.txt/b.mp3") = "/home/admin/a.txt"
/// ```
pub fn folder_name(path: &str) -> &str {
    match Anchors::of(path).separator {
        Some(sep) => &path[..sep],
        None => "",
    }
}

/// Extension after the last dot of the last segment, or `""`.
///
/// ```text
/// file_extension("abc")                     = ""
/// file_extension("a.b.rmvb")                = "rmvb"
/// file_extension("/home/admin/a.txt/b")     = ""
/// file_extension("/home/admin/a.txt/b.mp3") = "mp3"
/// ```
pub fn file_extension(path: &str) -> &str {
    match Anchors::of(path).extension_dot() {
        Some(dot) => &path[dot + EXTENSION_SEPARATOR.len_utf8()..],
        None => "",
    }
}

/// Parent directory ending in a separator; `None` without a separator or a parent
pub fn parent_folder(path: &str) -> Option<String> {
    Anchors::of(path).separator?;

    let parent = Path::new(path).parent()?.to_str()?;
    if parent.is_empty() {
        return None;
    }

    let mut parent = parent.to_string();
    if !parent.ends_with(MAIN_SEPARATOR) {
        parent.push(MAIN_SEPARATOR);
    }
    Some(parent)
}
