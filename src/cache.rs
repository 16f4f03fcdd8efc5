//! On-disk persistence of [`Enumeration`]s.
//!
//! An enumeration depends only on the grid's dimensions, so one file per `WIDTHxHEIGHT` serves every puzzle of that
//! size. Files are JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "width": 4,
//!   "height": 4,
//!   "all": [{ "path": [[0, 3], [1, 3]], "active": [1] }, ...],
//!   "complete": [...]
//! }
//! ```
//!
//! Writes go to a temporary file in the cache directory which is then renamed over the target, so a crash never leaves
//! a truncated cache behind. Anything unreadable is treated as a miss.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::enumerate::Enumeration;
use crate::graph::GridGraph;
use crate::location::{Dimension, Vertex};
use crate::snapshot::PathSnapshot;

const FORMAT_VERSION: u64 = 1;

/// Problems writing the cache. Reading never fails; it misses.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache directory does not exist and could not be made.
    #[error("cannot create cache directory {}", .path.display())]
    CreateDir {
        /// The cache directory.
        path: PathBuf,
        /// What the filesystem said.
        source: io::Error,
    },
    /// Writing or renaming a cache file failed.
    #[error("cannot write cache file {}", .path.display())]
    Write {
        /// The file being written.
        path: PathBuf,
        /// What the filesystem said.
        source: io::Error,
    },
    /// The enumeration could not be turned into JSON.
    #[error("cannot serialize paths for {key}")]
    Serialize {
        /// The entry being stored.
        key: CacheKey,
        /// What serde_json said.
        source: serde_json::Error,
    },
}

/// What a cache entry is keyed on: the grid's dimensions, nothing about any particular puzzle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CacheKey {
    /// Vertices per row.
    pub width: Dimension,
    /// Vertices per column.
    pub height: Dimension,
}

impl CacheKey {
    /// The key `graph` is cached under.
    pub fn of(graph: &GridGraph) -> Self {
        let (width, height) = graph.dims();
        Self { width, height }
    }

    fn file_name(&self) -> String {
        format!("paths-{}.json", self)
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Serialize)]
struct CacheFileOut<'a> {
    version: u64,
    width: usize,
    height: usize,
    all: &'a [PathSnapshot],
    complete: &'a [PathSnapshot],
}

#[derive(Deserialize)]
struct CacheFileIn {
    version: u64,
    width: usize,
    height: usize,
    all: Vec<PathSnapshot>,
    complete: Vec<PathSnapshot>,
}

/// A directory of enumerations, one file per grid size.
pub struct PathCache {
    dir: PathBuf,
    // held across load, compute and store so a key is never enumerated twice at once
    lock: Mutex<()>,
}

impl PathCache {
    /// A cache rooted at `dir`. Nothing touches the disk until the first load or store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    /// The directory holding the cache files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the entry for `key` lives, whether or not it exists yet.
    pub fn path_for(&self, key: CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Load the enumeration for `dims` from disk, or enumerate and persist it.
    ///
    /// A failure to persist is logged; the computed enumeration is returned either way.
    pub fn load_or_compute(&self, dims: (Dimension, Dimension)) -> Enumeration {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let graph = GridGraph::new(dims);
        let key = CacheKey::of(&graph);

        if let Some(enumeration) = self.read(&graph) {
            log::info!("loaded {key} paths from {}", self.path_for(key).display());
            return enumeration;
        }

        log::info!("no usable cache for {key}, enumerating");
        let enumeration = Enumeration::from_graph(graph);
        if let Err(err) = self.write(&enumeration) {
            match std::error::Error::source(&err) {
                Some(cause) => log::error!("{err}: {cause}"),
                None => log::error!("{err}"),
            }
        }
        enumeration
    }

    /// The cached enumeration for `dims`, if a readable one exists.
    pub fn load(&self, dims: (Dimension, Dimension)) -> Option<Enumeration> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read(&GridGraph::new(dims))
    }

    /// Persist `enumeration`, replacing any existing entry for its dimensions.
    pub fn store(&self, enumeration: &Enumeration) -> Result<(), CacheError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write(enumeration)
    }

    /// Remove the entry for `dims`. Returns whether there was one.
    pub fn clear(&self, dims: (Dimension, Dimension)) -> io::Result<bool> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (width, height) = dims;
        match fs::remove_file(self.path_for(CacheKey { width, height })) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn read(&self, graph: &GridGraph) -> Option<Enumeration> {
        let key = CacheKey::of(graph);
        let path = self.path_for(key);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                log::warn!("cannot open {}: {err}", path.display());
                return None;
            }
        };

        let parsed: CacheFileIn = match serde_json::from_reader(BufReader::new(file)) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("ignoring corrupt cache {}: {err}", path.display());
                return None;
            }
        };

        if let Err(problem) = check(graph, &parsed) {
            log::warn!("ignoring cache {}: {problem}", path.display());
            return None;
        }

        Some(Enumeration {
            graph: graph.clone(),
            all: parsed.all,
            complete: parsed.complete,
        })
    }

    fn write(&self, enumeration: &Enumeration) -> Result<(), CacheError> {
        let key = CacheKey::of(enumeration.graph());
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let target = self.path_for(key);
        let temp = self.dir.join(format!(".{}.{}.tmp", key.file_name(), std::process::id()));
        let document = CacheFileOut {
            version: FORMAT_VERSION,
            width: enumeration.graph().width(),
            height: enumeration.graph().height(),
            all: enumeration.all(),
            complete: enumeration.complete(),
        };

        let written = write_json(&temp, &document, key).and_then(|()| {
            fs::rename(&temp, &target).map_err(|source| CacheError::Write {
                path: target.clone(),
                source,
            })
        });
        if written.is_err() {
            // best effort; the temp file is garbage either way
            let _ = fs::remove_file(&temp);
        }
        written?;

        log::debug!("wrote {} snapshots to {}", enumeration.all().len(), target.display());
        Ok(())
    }
}

fn write_json(path: &Path, document: &CacheFileOut<'_>, key: CacheKey) -> Result<(), CacheError> {
    let io_err = |source| CacheError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, document).map_err(|source| CacheError::Serialize { key, source })?;
    writer.flush().map_err(io_err)?;
    writer.get_ref().sync_all().map_err(io_err)
}

/// Reject a parsed file that is not exactly the enumeration of `graph`.
///
/// Every snapshot must replay through [`PathSnapshot::from_path`] to itself, and the prefix of every snapshot must be
/// present. With those two, the set equals the full enumeration iff its size equals the number of moves available from
/// the start and from every snapshot in it.
fn check(graph: &GridGraph, parsed: &CacheFileIn) -> Result<(), String> {
    if parsed.version != FORMAT_VERSION {
        return Err(format!("format version {} (expected {FORMAT_VERSION})", parsed.version));
    }
    if (parsed.width, parsed.height) != (graph.width(), graph.height()) {
        return Err(format!("holds a {}x{} grid", parsed.width, parsed.height));
    }

    let start = PathSnapshot::new(graph);
    let mut seen: HashSet<&[Vertex]> = HashSet::with_capacity(parsed.all.len());
    for snapshot in &parsed.all {
        match PathSnapshot::from_path(graph, snapshot.path()) {
            Ok(replayed) if replayed == *snapshot && !snapshot.is_empty() => {}
            _ => return Err(format!("snapshot {:?} is not a line on the grid", snapshot.path())),
        }
        if !seen.insert(snapshot.path()) {
            return Err(format!("snapshot {:?} is listed twice", snapshot.path()));
        }
    }

    let orphaned = parsed.all.iter().any(|snapshot| {
        let prefix = &snapshot.path()[..snapshot.path().len() - 1];
        prefix.len() > 1 && !seen.contains(prefix)
    });
    if orphaned {
        return Err("a snapshot is missing its prefix".to_string());
    }

    let expected: usize = std::iter::once(&start)
        .chain(&parsed.all)
        .map(|snapshot| graph.moves(snapshot, snapshot.last()).len())
        .sum();
    if expected != parsed.all.len() {
        return Err(format!("holds {} snapshots, expected {expected}", parsed.all.len()));
    }

    if !parsed.all.iter().filter(|snapshot| snapshot.is_complete(graph)).eq(&parsed.complete) {
        return Err("complete snapshots disagree with the full list".to_string());
    }

    Ok(())
}
