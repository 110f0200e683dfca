// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Reading and writing of JSON artifacts under the output root.
///
/// Accumulation files (release indexes, announcement lists) are updated with
/// a read-modify-write cycle that holds an async lock keyed by the file path,
/// so concurrent generators touching the same file never lose an update.
use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use serde::{Serialize, de::DeserializeOwned};
use tokio::{
    fs,
    io::AsyncWriteExt,
    sync::{Mutex as AsyncMutex, OwnedMutexGuard},
};
use tracing::debug;

use crate::error::{self, Error};

/// Async locks keyed by artifact path.
///
/// Entries are created on first use and live as long as the registry; the set
/// of accumulation files touched by a run is small and fixed by the
/// configuration.
#[derive(Debug, Default,)]
pub struct PathLocks
{
    locks: Mutex<HashMap<PathBuf, Arc<AsyncMutex<(),>,>,>,>,
}

impl PathLocks
{
    /// Waits for exclusive access to `path`.
    ///
    /// The returned guard releases the lock when dropped.
    pub async fn acquire(&self, path: &Path,) -> OwnedMutexGuard<(),>
    {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner,);
            Arc::clone(locks.entry(path.to_path_buf(),).or_default(),)
        };
        lock.lock_owned().await
    }
}

/// Persists generator output as JSON files.
#[derive(Debug, Default,)]
pub struct ArtifactWriter
{
    locks: PathLocks,
}

impl ArtifactWriter
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Creates `path` and all missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the directory cannot be created.
    pub async fn ensure_dir(&self, path: &Path,) -> Result<(), Error,>
    {
        fs::create_dir_all(path,).await.map_err(|source| error::io_error(path, source,),)
    }

    /// Writes `value` to `path`.
    ///
    /// Values that serialize to a JSON string are written verbatim, which lets
    /// callers pass pre-serialized payloads; everything else is written as
    /// formatted JSON. With `overwrite` unset an existing file is left
    /// untouched. Returns whether the file was written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] when `value` cannot be encoded and
    /// [`Error::Io`] when the file cannot be written.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    ///
    /// use static_api::ArtifactWriter;
    ///
    /// # async fn example() -> Result<(), static_api::Error> {
    /// let writer = ArtifactWriter::new();
    /// writer.ensure_dir(Path::new("static",),).await?;
    /// writer.write(&["v1.0.0"], Path::new("static/release/app.json",), true,).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn write<T,>(&self, value: &T, path: &Path, overwrite: bool,) -> Result<bool, Error,>
    where
        T: Serialize + ?Sized,
    {
        let contents = encode(value,)?;

        if overwrite {
            fs::write(path, contents,).await.map_err(|source| error::io_error(path, source,),)?;
            debug!("Wrote {}", path.display());
            return Ok(true,);
        }

        let mut file =
            match fs::OpenOptions::new().write(true,).create_new(true,).open(path,).await {
                Ok(file,) => file,
                Err(source,) if source.kind() == ErrorKind::AlreadyExists => {
                    debug!("Kept existing {}", path.display());
                    return Ok(false,);
                }
                Err(source,) => return Err(error::io_error(path, source,),),
            };

        file.write_all(contents.as_bytes(),)
            .await
            .map_err(|source| error::io_error(path, source,),)?;
        file.flush().await.map_err(|source| error::io_error(path, source,),)?;
        debug!("Created {}", path.display());
        Ok(true,)
    }

    /// Reads and decodes `path`, returning `default` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file exists but cannot be read and
    /// [`Error::Decode`] when its contents are not valid JSON for `T`.
    pub async fn read<T,>(&self, path: &Path, default: T,) -> Result<T, Error,>
    where
        T: DeserializeOwned,
    {
        let contents = match fs::read_to_string(path,).await {
            Ok(contents,) => contents,
            Err(source,) if source.kind() == ErrorKind::NotFound => return Ok(default,),
            Err(source,) => return Err(error::io_error(path, source,),),
        };

        serde_json::from_str(&contents,).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        },)
    }

    /// Waits for exclusive access to `path`, shared with [`update`](Self::update).
    ///
    /// Calling [`update`](Self::update) on `path` while holding the guard
    /// deadlocks; use [`read`](Self::read) and [`write`](Self::write) instead.
    pub async fn lock(&self, path: &Path,) -> OwnedMutexGuard<(),>
    {
        self.locks.acquire(path,).await
    }

    /// Applies `apply` to the decoded contents of `path` and writes the result
    /// back, holding the lock for `path` for the whole cycle.
    ///
    /// The file is written even when `apply` leaves the value unchanged.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`read`](Self::read) and
    /// [`write`](Self::write); the lock is released on every path.
    pub async fn update<T, F, R,>(&self, path: &Path, default: T, apply: F,) -> Result<R, Error,>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T,) -> R,
    {
        let _guard = self.lock(path,).await;

        let mut value = self.read(path, default,).await?;
        let outcome = apply(&mut value,);
        self.write(&value, path, true,).await?;

        Ok(outcome,)
    }
}

fn encode<T,>(value: &T,) -> Result<String, Error,>
where
    T: Serialize + ?Sized,
{
    if let serde_json::Value::String(raw,) = serde_json::to_value(value,)? {
        return Ok(raw,);
    }
    Ok(serde_json::to_string_pretty(value,)?,)
}
