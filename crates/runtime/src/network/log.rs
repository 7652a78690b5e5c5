//! Append-only log of accepted requests.
//!
//! One JSON request per line, in acceptance order. Only requests that entered
//! the queue are recorded; counters are regenerated by `on_end` during replay
//! and never appear in the log.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use game_core::{Request, WorldMut};
use tracing::debug;

use super::{NetworkError, Result, wire};
use crate::scheduler::{ActionQueue, Rejection, Submission};

pub struct RequestLog {
    path: PathBuf,
    writer: BufWriter<File>,
    entries: u64,
}

impl RequestLog {
    /// Creates a new log.
    ///
    /// # Errors
    ///
    /// Returns error if the file already exists (prevents accidental overwrites).
    pub fn create(base_dir: impl AsRef<Path>, filename: impl AsRef<str>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        std::fs::create_dir_all(base_dir)?;

        let path = base_dir.join(filename.as_ref());
        if path.exists() {
            return Err(NetworkError::LogAlreadyExists(path.display().to_string()));
        }

        let file = OpenOptions::new().create_new(true).write(true).open(&path)?;
        debug!(target: "runtime::network", path = %path.display(), "created request log");

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            entries: 0,
        })
    }

    /// Opens an existing log for appending.
    pub fn open(base_dir: impl AsRef<Path>, filename: impl AsRef<str>) -> Result<Self> {
        let path = base_dir.as_ref().join(filename.as_ref());
        let entries = Self::read_all(&path)?.len() as u64;
        let file = OpenOptions::new().append(true).open(&path)?;
        debug!(
            target: "runtime::network",
            path = %path.display(),
            entries,
            "opened request log"
        );

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            entries,
        })
    }

    /// Appends `request` and returns its index in the log.
    pub fn append(&mut self, request: &Request) -> Result<u64> {
        let line = wire::encode(request)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        let index = self.entries;
        self.entries += 1;
        Ok(index)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Reads every request recorded at `path`. Blank lines are skipped.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<Request>> {
        let reader = BufReader::new(File::open(path)?);
        let mut requests = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let request = wire::decode(&line).map_err(|error| match error {
                NetworkError::Codec(source) => NetworkError::CorruptedLog {
                    line: index + 1,
                    source,
                },
                other => other,
            })?;
            requests.push(request);
        }
        Ok(requests)
    }
}

impl Drop for RequestLog {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Feeds a recorded stream through `queue` as authoritative instructions,
/// running each request to completion (follow-ups included) before the next.
///
/// Returns the requests that could not be replayed.
pub fn replay<W, I>(
    queue: &mut ActionQueue,
    world: &mut W,
    requests: I,
    tick_ms: u32,
) -> Vec<(Request, Rejection)>
where
    W: WorldMut,
    I: IntoIterator<Item = Request>,
{
    let mut rejected = Vec::new();
    for request in requests {
        if let Submission::Rejected(rejection) = queue.submit_authoritative(&*world, request.clone())
        {
            rejected.push((request, rejection));
        }
        while !queue.is_idle() {
            queue.tick(world, tick_ms);
        }
    }
    rejected
}
