//! Module `file_ops`
//!
//! Reads and writes file content. Every handle is scoped to one call and
//! dropped on every exit path, including early returns on error.
//! Reads of a missing file give `None`; I/O failures are returned as errors.

use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::StorageError;
use crate::storage::DirectoryManager;
use crate::transfer::charset::Charset;
use crate::utils::logging::DiagnosticSink;

/// File size in bytes; `None` for an empty path or anything but a regular file
pub fn file_size(path: impl AsRef<Path>) -> Option<u64> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return None;
    }
    fs::metadata(path)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
}

/// Open a regular file for reading, positioned `skip` bytes in
pub fn open_reader(path: impl AsRef<Path>, skip: u64) -> Result<Option<File>, StorageError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(None);
    }

    let mut file = File::open(path).map_err(|e| StorageError::io(path.display().to_string(), e))?;
    if skip > 0 {
        file.seek(SeekFrom::Start(skip))
            .map_err(|e| StorageError::io(path.display().to_string(), e))?;
    }
    Ok(Some(file))
}

/// Split text into lines on `\n`, `\r` or `\r\n`; terminators are dropped
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Text and byte I/O on top of the directory manager
pub struct FileIo {
    dirs: Arc<DirectoryManager>,
    sink: Arc<dyn DiagnosticSink>,
    tag: String,
    buffer_size: usize,
    line_terminator: String,
}

impl FileIo {
    pub fn new(
        config: &StoreConfig,
        dirs: Arc<DirectoryManager>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            dirs,
            sink,
            tag: config.log_tag.clone(),
            buffer_size: config.buffer_size.max(1),
            line_terminator: config.line_terminator.clone(),
        }
    }

    fn fail(&self, err: StorageError) -> StorageError {
        self.sink.report(&self.tag, "File operation failed", Some(&err));
        err
    }

    /// Whole file as one string, lines joined by the configured terminator
    pub fn read_all_text(
        &self,
        path: impl AsRef<Path>,
        charset: Charset,
    ) -> Result<Option<String>, StorageError> {
        Ok(self
            .read_lines(path, charset)?
            .map(|lines| lines.join(&self.line_terminator)))
    }

    /// File content one line per entry, in order
    pub fn read_lines(
        &self,
        path: impl AsRef<Path>,
        charset: Charset,
    ) -> Result<Option<Vec<String>>, StorageError> {
        Ok(self
            .read_bytes(path)?
            .map(|bytes| split_lines(&charset.decode(&bytes))))
    }

    /// Raw file content
    pub fn read_bytes(&self, path: impl AsRef<Path>) -> Result<Option<Vec<u8>>, StorageError> {
        let path = path.as_ref();
        if !path.is_file() {
            debug!("No regular file at {}", path.display());
            return Ok(None);
        }

        let display = path.display().to_string();
        let file = File::open(path).map_err(|e| self.fail(StorageError::io(&display, e)))?;
        let mut reader = BufReader::new(file);
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| self.fail(StorageError::io(&display, e)))?;
        Ok(Some(bytes))
    }

    /// Write `content`, either appending or replacing what was there
    pub fn write_text(
        &self,
        path: impl AsRef<Path>,
        content: &str,
        append: bool,
    ) -> Result<(), StorageError> {
        self.write_with(path.as_ref(), content.as_bytes(), append)
    }

    /// Replace the file content with `bytes`
    pub fn write_bytes(&self, path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), StorageError> {
        self.write_with(path.as_ref(), bytes, false)
    }

    fn write_with(&self, path: &Path, bytes: &[u8], append: bool) -> Result<(), StorageError> {
        self.prepare_parent(path)?;

        let display = path.display().to_string();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(|e| self.fail(StorageError::io(&display, e)))?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(bytes)
            .and_then(|()| writer.flush())
            .map_err(|e| self.fail(StorageError::io(&display, e)))?;

        info!(
            "Wrote {} bytes to {} ({})",
            bytes.len(),
            display,
            if append { "append" } else { "truncate" }
        );
        Ok(())
    }

    /// Copy `source` into the file in fixed-size chunks and return the byte count.
    ///
    /// Takes the source by value: it is dropped (closed) before this returns.
    pub fn write_stream<R: Read>(
        &self,
        path: impl AsRef<Path>,
        mut source: R,
    ) -> Result<u64, StorageError> {
        let path = path.as_ref();
        self.prepare_parent(path)?;

        let display = path.display().to_string();
        let mut dest = File::create(path).map_err(|e| self.fail(StorageError::io(&display, e)))?;

        let mut buffer = vec![0u8; self.buffer_size];
        let mut total_bytes = 0u64;

        loop {
            let n = match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    warn!("Interrupted read while copying into {}, retrying", display);
                    continue;
                }
                Err(e) => return Err(self.fail(StorageError::io(&display, e))),
            };

            dest.write_all(&buffer[..n])
                .map_err(|e| self.fail(StorageError::io(&display, e)))?;
            total_bytes += n as u64;
        }

        dest.flush()
            .map_err(|e| self.fail(StorageError::io(&display, e)))?;
        drop(source);

        info!("Copied stream into {} ({} bytes)", display, total_bytes);
        Ok(total_bytes)
    }

    fn prepare_parent(&self, path: &Path) -> Result<(), StorageError> {
        if path.as_os_str().is_empty() {
            return Err(self.fail(StorageError::InvalidPath("Empty path".into())));
        }

        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self
                .dirs
                .create_directory(parent)
                .map_err(|e| self.fail(e)),
            _ => Ok(()),
        }
    }
}
