//! File-backed sessions and the store that creates them.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::codec::{self, Entries};
use super::id::{IdLength, DEFAULT_ID_LENGTH};
use super::{IdGenerator, SessionId, SessionState, SessionValue};
use crate::error::SessionError;
use crate::Result;

/// A key/value session persisted to a file named after its id.
///
/// The session owns its backing file exclusively. Entries live in memory
/// and are written back by [`flush`](Self::flush), by [`close`](Self::close),
/// or when the session is dropped.
#[derive(Debug)]
pub struct Session<const LEN: usize = DEFAULT_ID_LENGTH> {
    id: SessionId<LEN>,
    path: PathBuf,
    entries: Entries,
    file: Option<File>,
    state: SessionState,
}

impl<const LEN: usize> Session<LEN> {
    /// Create the backing file for a freshly generated id.
    fn create(dir: &Path, id: SessionId<LEN>) -> Result<Self> {
        let path = dir.join(id.as_str());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| match source.kind() {
                ErrorKind::AlreadyExists => SessionError::AlreadyExists { path: path.clone() },
                _ => SessionError::FileOpenFailure {
                    path: path.clone(),
                    source,
                },
            })?;

        debug!(id = %id, path = %path.display(), "session created");
        Self::activate(id, path, file, Entries::new())
    }

    /// Open an existing backing file and load its entries.
    fn resume(dir: &Path, id: SessionId<LEN>) -> Result<Self> {
        let path = dir.join(id.as_str());
        let open_failure = |source| SessionError::FileOpenFailure {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(open_failure)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(open_failure)?;

        let entries = codec::deserialize(&bytes).map_err(|err| SessionError::DataCorrupted {
            path: path.clone(),
            reason: err.to_string(),
        })?;

        debug!(id = %id, entries = entries.len(), "session resumed");
        Self::activate(id, path, file, entries)
    }

    fn activate(id: SessionId<LEN>, path: PathBuf, file: File, entries: Entries) -> Result<Self> {
        let () = IdLength::<LEN>::CHECK;
        let mut session = Self {
            id,
            path,
            entries,
            file: Some(file),
            state: SessionState::Uninitialized,
        };
        session.state.transition_to(SessionState::Active)?;
        Ok(session)
    }

    /// Get the session id.
    pub fn id(&self) -> &SessionId<LEN> {
        &self.id
    }

    /// Get the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if the backing file handle is usable for a flush.
    pub fn is_open(&self) -> bool {
        self.state.is_active() && self.file.is_some()
    }

    /// Look up a value without creating it.
    pub fn lookup(&self, key: &str) -> Option<&SessionValue> {
        self.entries.get(key)
    }

    /// Get the value under `key`, inserting an empty one if absent.
    ///
    /// Unlike [`lookup`](Self::lookup), calling this on a missing key adds
    /// that key to the session.
    pub fn get_or_create(&mut self, key: &str) -> &mut SessionValue {
        self.entries.entry(key.to_owned()).or_default()
    }

    /// Replace the value under `key`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.get_or_create(key).set_value(value);
    }

    /// Append the textual form of `value` to the value under `key`.
    pub fn append(&mut self, key: &str, value: impl fmt::Display) {
        self.get_or_create(key).append_converted(value);
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<SessionValue> {
        self.entries.remove(key)
    }

    /// Check if a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the session holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &SessionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drop all entries. The id and backing file are untouched until the
    /// next flush.
    pub fn unset(&mut self) {
        self.entries.clear();
    }

    /// Render the entries as `'key' => 'value'` lines.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    /// Overwrite the backing file with the current entries.
    ///
    /// Returns the number of entries written. On failure the handle is
    /// released and later flushes fail as well.
    pub fn flush(&mut self) -> Result<usize> {
        if !self.is_open() {
            return Err(self.flush_failure(io::Error::other(
                "session file handle is not usable",
            )));
        }

        // Release the current handle before truncating.
        self.file = None;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| self.flush_failure(source))?;

        let mut writer = BufWriter::new(&mut file);
        let count = codec::serialize(&self.entries, &mut writer)
            .and_then(|count| writer.flush().map(|()| count))
            .map_err(|source| self.flush_failure(source))?;
        drop(writer);

        self.file = Some(file);
        debug!(id = %self.id, entries = count, "session flushed");
        Ok(count)
    }

    /// Flush the entries and release the backing file.
    ///
    /// Closing an already closed session does nothing. If the final flush
    /// fails the handle is still released and the error is returned.
    pub fn close(&mut self) -> Result<()> {
        if !self.state.is_active() {
            return Ok(());
        }

        let result = if self.file.is_some() {
            self.flush().map(|_| ())
        } else {
            Ok(())
        };

        self.file = None;
        self.state.transition_to(SessionState::Closed)?;
        debug!(id = %self.id, "session closed");
        result
    }

    fn flush_failure(&self, source: io::Error) -> SessionError {
        SessionError::FlushFailure {
            path: self.path.clone(),
            source,
        }
    }
}

impl<const LEN: usize> fmt::Display for Session<LEN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "'{key}' => '{value}'")?;
        }
        Ok(())
    }
}

impl<const LEN: usize> Drop for Session<LEN> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(id = %self.id, error = %err, "failed to flush session on drop");
        }
    }
}

/// Factory for sessions stored in one directory.
///
/// Ids are drawn from the process-wide [`IdGenerator`] unless a dedicated
/// generator is supplied with [`with_generator`](Self::with_generator).
///
/// The id length `LEN` must be within 5..=100; any other length is rejected
/// when the store type is built:
///
/// ```compile_fail
/// use sessionfile::SessionStore;
///
/// let mut store: SessionStore<4> = SessionStore::with_dir(".");
/// let _ = store.create();
/// ```
///
/// ```compile_fail
/// use sessionfile::SessionStore;
///
/// let store: SessionStore<101> = SessionStore::with_dir(".");
/// let _ = store.dir();
/// ```
///
/// ```
/// use sessionfile::SessionStore;
///
/// let short: SessionStore<5> = SessionStore::with_dir(".");
/// let long: SessionStore<100> = SessionStore::with_dir(".");
/// assert_eq!(short.dir(), long.dir());
/// ```
#[derive(Debug)]
pub struct SessionStore<const LEN: usize = DEFAULT_ID_LENGTH> {
    dir: PathBuf,
    generator: Option<IdGenerator>,
}

impl SessionStore {
    /// Create a store rooted at the process working directory.
    pub fn new() -> Self {
        Self::with_dir(".")
    }

    /// Create a store with the default id length rooted at `dir`.
    pub fn new_in(dir: impl Into<PathBuf>) -> Self {
        Self::with_dir(dir)
    }
}

impl<const LEN: usize> SessionStore<LEN> {
    /// Create a store rooted at `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        let () = IdLength::<LEN>::CHECK;
        Self {
            dir: dir.into(),
            generator: None,
        }
    }

    /// Use a dedicated id generator instead of the process-wide one.
    pub fn with_generator(mut self, generator: IdGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Get the directory holding the session files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the backing file path for an id.
    pub fn path_for(&self, id: &SessionId<LEN>) -> PathBuf {
        self.dir.join(id.as_str())
    }

    /// Create a new session with a freshly generated id.
    ///
    /// Fails with [`SessionError::AlreadyExists`] if a file with the
    /// generated id is already present. No retry is attempted.
    pub fn create(&mut self) -> Result<Session<LEN>> {
        let id = match self.generator.as_mut() {
            Some(generator) => generator.generate(),
            None => IdGenerator::shared()?.generate(),
        };
        Session::create(&self.dir, id)
    }

    /// Resume the session stored under `id`.
    pub fn resume(&self, id: &str) -> Result<Session<LEN>> {
        let id: SessionId<LEN> = id.parse()?;
        Session::resume(&self.dir, id)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
