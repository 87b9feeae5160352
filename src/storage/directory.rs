//! Directory lifecycle
//!
//! Idempotent creation and fail-fast recursive deletion of directory trees.
//! Every call looks at the filesystem afresh; no existence check is cached.

use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::StorageError;
use crate::path::folder_name;
use crate::storage::results::DeleteState;
use crate::utils::logging::DiagnosticSink;

/// Check if a regular file exists at `path`
pub fn is_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    !path.as_os_str().is_empty() && path.is_file()
}

/// Check if a directory exists at `path`
pub fn is_directory(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    !path.as_os_str().is_empty() && path.is_dir()
}

/// Creates and deletes directory trees, reporting failures to a sink
pub struct DirectoryManager {
    tag: String,
    sink: Arc<dyn DiagnosticSink>,
    /// Serializes file creation so two callers don't race on the same ancestors.
    /// Advisory only: other operations don't take it.
    creation_lock: Mutex<()>,
}

impl DirectoryManager {
    pub fn new(tag: impl Into<String>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            tag: tag.into(),
            sink,
            creation_lock: Mutex::new(()),
        }
    }

    fn report(&self, message: &str, cause: Option<&io::Error>) {
        self.sink
            .report(&self.tag, message, cause.map(|e| e as &dyn std::error::Error));
    }

    /// Create `path` and any missing ancestors, returning the cause on failure
    pub fn create_directory(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(StorageError::InvalidPath("Empty path".into()));
        }

        if path.is_dir() {
            debug!("Directory already exists: {}", path.display());
            return Ok(());
        }

        fs::create_dir_all(path).map_err(|e| StorageError::io(path.display().to_string(), e))?;
        info!("Created directory {}", path.display());
        Ok(())
    }

    /// Create `path` and any missing ancestors. True if the directory exists afterwards.
    pub fn ensure_directory(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.create_directory(path) {
            Ok(()) => true,
            Err(e) => {
                self.sink.report(
                    &self.tag,
                    &format!("Failed to create directory {}", path.display()),
                    Some(&e),
                );
                false
            }
        }
    }

    /// Create the folder part of a file path. False when the path has no folder part.
    pub fn ensure_parent_directory(&self, file_path: &str) -> bool {
        let folder = folder_name(file_path);
        if folder.is_empty() {
            return false;
        }
        self.ensure_directory(folder)
    }

    /// Create an empty file and any missing ancestors. An existing file is left untouched.
    pub fn ensure_file(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if path.as_os_str().is_empty() {
            return Err(StorageError::InvalidPath("Empty path".into()));
        }

        let _guard = self
            .creation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => {
                debug!("File already exists: {}", display);
                return Ok(());
            }
            Ok(_) => return Err(StorageError::NotAFile(display)),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::io(display, e)),
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::io(parent.display().to_string(), e))?;
        }

        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_) => {
                info!("Created file {}", display);
                Ok(())
            }
            // lost a race with another creator
            Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_file() => Ok(()),
            Err(e) => Err(StorageError::io(display, e)),
        }
    }

    /// Like `ensure_file`, but reports failures to the sink and returns the path on success
    pub fn create_file_with_parents(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        let path = path.as_ref();
        match self.ensure_file(path) {
            Ok(()) => Some(path.to_path_buf()),
            Err(e) => {
                self.sink.report(
                    &self.tag,
                    &format!("Failed to create file {}", path.display()),
                    Some(&e),
                );
                None
            }
        }
    }

    /// Delete a file or a whole directory tree. A missing path counts as deleted.
    ///
    /// A `false` result means the tree may be partially deleted.
    pub fn delete_recursive(&self, path: impl AsRef<Path>) -> bool {
        self.delete_tree(path).succeeded()
    }

    /// Delete a file or directory tree and return the terminal state
    pub fn delete_tree(&self, path: impl AsRef<Path>) -> DeleteState {
        let path = path.as_ref();
        self.delete_tree_with(path, &mut remove_entry, &mut |state: &DeleteState| {
            debug!("Delete {}: {:?}", path.display(), state)
        })
    }

    /// Runs a delete from `Pending` to a terminal state, handing every state to `observe`
    fn delete_tree_with(
        &self,
        path: &Path,
        remove: &mut dyn FnMut(&Entry) -> io::Result<()>,
        observe: &mut dyn FnMut(&DeleteState),
    ) -> DeleteState {
        observe(&DeleteState::Pending);
        let terminal = self.run_delete(path, remove, observe);
        observe(&terminal);
        terminal
    }

    fn run_delete(
        &self,
        path: &Path,
        remove: &mut dyn FnMut(&Entry) -> io::Result<()>,
        observe: &mut dyn FnMut(&DeleteState),
    ) -> DeleteState {
        if path.as_os_str().is_empty() {
            return DeleteState::Deleted;
        }

        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Nothing to delete at {}", path.display());
                return DeleteState::Deleted;
            }
            Err(e) => return self.failed(path.to_path_buf(), e),
        };

        if !meta.is_dir() {
            return match remove(&Entry::File(path.to_path_buf())) {
                Ok(()) => {
                    info!("Deleted file {}", path.display());
                    DeleteState::Deleted
                }
                Err(e) => self.failed(path.to_path_buf(), e),
            };
        }

        observe(&DeleteState::Recursing);
        match remove_tree(path, false, remove) {
            Ok(()) => {
                info!("Deleted directory tree {}", path.display());
                DeleteState::Deleted
            }
            Err((failed_at, e)) => self.failed(failed_at, e),
        }
    }

    /// Delete everything inside a directory but keep the directory itself
    pub fn delete_all_in_folder(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if !is_directory(path) {
            return false;
        }

        match remove_tree(path, true, &mut remove_entry) {
            Ok(()) => {
                info!("Emptied directory {}", path.display());
                true
            }
            Err((failed_at, e)) => {
                self.failed(failed_at, e);
                false
            }
        }
    }

    fn failed(&self, path: PathBuf, error: io::Error) -> DeleteState {
        self.report(&format!("Failed to delete {}", path.display()), Some(&error));
        DeleteState::Failed { path }
    }
}

enum Entry {
    File(PathBuf),
    Dir(PathBuf),
}

impl Entry {
    fn into_path(self) -> PathBuf {
        match self {
            Entry::File(path) | Entry::Dir(path) => path,
        }
    }
}

/// One directory being emptied
struct Frame {
    dir: PathBuf,
    /// Popped from the back, so files come out before subdirectories
    pending: Vec<Entry>,
}

impl Frame {
    fn open(dir: PathBuf) -> Result<Self, (PathBuf, io::Error)> {
        let listing = fs::read_dir(&dir).map_err(|e| (dir.clone(), e))?;

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in listing {
            let entry = entry.map_err(|e| (dir.clone(), e))?;
            let file_type = entry.file_type().map_err(|e| (entry.path(), e))?;
            if file_type.is_dir() {
                dirs.push(Entry::Dir(entry.path()));
            } else {
                files.push(Entry::File(entry.path()));
            }
        }

        dirs.extend(files);
        Ok(Self { dir, pending: dirs })
    }
}

fn remove_entry(entry: &Entry) -> io::Result<()> {
    match entry {
        Entry::File(path) => fs::remove_file(path),
        Entry::Dir(path) => fs::remove_dir(path),
    }
}

/// Depth-first removal of everything under `root`. Stops at the first failure;
/// entries not yet visited are left alone, entries already removed stay removed.
/// `remove` deletes one file, or one directory once it is empty.
fn remove_tree(
    root: &Path,
    keep_root: bool,
    remove: &mut dyn FnMut(&Entry) -> io::Result<()>,
) -> Result<(), (PathBuf, io::Error)> {
    let mut stack = vec![Frame::open(root.to_path_buf())?];

    loop {
        let Some(frame) = stack.last_mut() else {
            return Ok(());
        };

        match frame.pending.pop() {
            Some(Entry::Dir(dir)) => stack.push(Frame::open(dir)?),
            Some(file) => remove(&file).map_err(|e| (file.into_path(), e))?,
            None => {
                let is_root = stack.len() == 1;
                if let Some(done) = stack.pop() {
                    if !(is_root && keep_root) {
                        let entry = Entry::Dir(done.dir);
                        remove(&entry).map_err(|e| (entry.into_path(), e))?;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logging::testing::RecordingSink;

    fn manager() -> (DirectoryManager, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (DirectoryManager::new("test", sink.clone()), sink)
    }

    #[test]
    fn test_ensure_directory_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, sink) = manager();
        let target = tmp.path().join("a/b/c");

        assert!(dirs.ensure_directory(&target));
        assert!(dirs.ensure_directory(&target));
        assert!(target.is_dir());
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_ensure_directory_fails_on_file() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, sink) = manager();
        let occupied = tmp.path().join("occupied");
        fs::write(&occupied, b"x").unwrap();

        assert!(!dirs.ensure_directory(&occupied));
        assert!(!dirs.ensure_directory(""));
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn test_ensure_parent_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, _) = manager();
        let file = tmp.path().join("x/y/z.txt");

        assert!(dirs.ensure_parent_directory(file.to_str().unwrap()));
        assert!(tmp.path().join("x/y").is_dir());
        assert!(!file.exists());
        assert!(!dirs.ensure_parent_directory("z.txt"));
    }

    #[test]
    fn test_ensure_file_does_not_truncate() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, _) = manager();
        let file = tmp.path().join("deep/dir/data.bin");

        dirs.ensure_file(&file).unwrap();
        assert!(is_file(&file));
        assert_eq!(fs::metadata(&file).unwrap().len(), 0);

        fs::write(&file, b"keep me").unwrap();
        dirs.ensure_file(&file).unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"keep me");
    }

    #[test]
    fn test_ensure_file_rejects_directory_and_empty_path() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, _) = manager();

        assert!(matches!(
            dirs.ensure_file(tmp.path()),
            Err(StorageError::NotAFile(_))
        ));
        assert!(matches!(
            dirs.ensure_file(""),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_delete_recursive_removes_whole_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, _) = manager();
        let root = tmp.path().join("root");
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::create_dir_all(root.join("a/c")).unwrap();
        fs::write(root.join("a/b/file.txt"), b"data").unwrap();
        fs::write(root.join("top.txt"), b"data").unwrap();

        assert_eq!(dirs.delete_tree(&root), DeleteState::Deleted);
        assert!(!root.exists());
    }

    #[test]
    fn test_delete_recursive_missing_and_empty_paths_succeed() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, sink) = manager();

        assert!(dirs.delete_recursive(tmp.path().join("never-created")));
        assert!(dirs.delete_recursive(""));
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_delete_recursive_plain_file() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, _) = manager();
        let file = tmp.path().join("lonely.txt");
        fs::write(&file, b"bye").unwrap();

        assert!(dirs.delete_recursive(&file));
        assert!(!file.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_recursive_does_not_follow_symlinks() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, _) = manager();
        let outside = tmp.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("precious.txt"), b"keep").unwrap();

        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        assert!(dirs.delete_recursive(&root));
        assert!(!root.exists());
        assert!(outside.join("precious.txt").is_file());
    }

    #[test]
    fn test_delete_all_in_folder_keeps_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, _) = manager();
        let root = tmp.path().join("cache");
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("nested/deeper/x"), b"1").unwrap();
        fs::write(root.join("y"), b"2").unwrap();

        assert!(dirs.delete_all_in_folder(&root));
        assert!(root.is_dir());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);

        assert!(!dirs.delete_all_in_folder(root.join("missing")));
    }

    #[test]
    fn test_delete_stops_at_first_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, sink) = manager();
        let root = tmp.path().join("root");
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("nested/deep.txt"), b"0").unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            fs::write(root.join(name), b"1").unwrap();
        }

        // second file visited refuses to go; everything else really is removed
        let mut visited = Vec::new();
        let mut remove = |entry: &Entry| {
            if let Entry::File(path) = entry {
                visited.push(path.clone());
                if visited.len() == 2 {
                    return Err(io::Error::new(ErrorKind::PermissionDenied, "locked"));
                }
            }
            remove_entry(entry)
        };
        let mut states = Vec::new();
        let state = dirs.delete_tree_with(&root, &mut remove, &mut |s: &DeleteState| {
            states.push(s.clone())
        });

        assert_eq!(visited.len(), 2);
        assert_eq!(
            state,
            DeleteState::Failed {
                path: visited[1].clone()
            }
        );
        assert!(!visited[0].exists());
        assert!(visited[1].exists());

        // the third sibling file and the subdirectory were never visited
        let left: Vec<_> = ["a.txt", "b.txt", "c.txt"]
            .iter()
            .map(|name| root.join(name))
            .filter(|path| !visited.contains(path))
            .collect();
        assert_eq!(left.len(), 1);
        assert!(left[0].is_file());
        assert!(root.join("nested/deep.txt").is_file());

        assert_eq!(states, vec![DeleteState::Pending, DeleteState::Recursing, state]);
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn test_delete_states_for_file_and_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, _) = manager();
        let file = tmp.path().join("single.txt");
        fs::write(&file, b"x").unwrap();
        let root = tmp.path().join("tree");
        fs::create_dir_all(root.join("sub")).unwrap();

        let mut states = Vec::new();
        dirs.delete_tree_with(&file, &mut remove_entry, &mut |s: &DeleteState| {
            states.push(s.clone())
        });
        assert_eq!(states, vec![DeleteState::Pending, DeleteState::Deleted]);

        states.clear();
        dirs.delete_tree_with(&root, &mut remove_entry, &mut |s: &DeleteState| {
            states.push(s.clone())
        });
        assert_eq!(
            states,
            vec![DeleteState::Pending, DeleteState::Recursing, DeleteState::Deleted]
        );
        assert!(!root.exists());
    }

    #[test]
    fn test_failed_delete_is_a_partial_failure() {
        let failed = DeleteState::Failed {
            path: PathBuf::from("/x"),
        };
        assert!(!failed.succeeded());
        assert_eq!(
            failed.failure_kind(),
            Some(crate::error::FailureKind::PartialFailure)
        );
        assert_eq!(DeleteState::Deleted.failure_kind(), None);
    }

    #[test]
    fn test_create_directory_reports_cause() {
        let tmp = tempfile::tempdir().unwrap();
        let (dirs, sink) = manager();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        match dirs.create_directory(blocker.join("child")) {
            Err(StorageError::Io(path, _)) => assert!(path.ends_with("child")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(sink.count(), 0);
    }
}
