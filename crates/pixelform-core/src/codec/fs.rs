//! Dependency-injected file access.
//!
//! Every entry point that touches files takes a [`FileSystem`] explicitly;
//! there is no process-wide registry to swap. Production code passes
//! [`StdFs`], tests pass fakes.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// A readable handle with an explicit close step.
///
/// Dropping a handle without calling `close` releases it silently; calling
/// `close` surfaces deferred release errors so callers can report them.
pub trait ReadHandle: Read {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A writable handle with an explicit close step.
pub trait WriteHandle: Write {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The file access seam used by [`super::open_image`] / [`super::save_image`].
pub trait FileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn ReadHandle>>;
    fn create(&self, path: &Path) -> io::Result<Box<dyn WriteHandle>>;
}

/// The real local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl ReadHandle for File {}

impl WriteHandle for File {
    fn close(&mut self) -> io::Result<()> {
        // Push buffered data to disk so write-back errors surface here
        // instead of being dropped with the handle.
        self.sync_all()
    }
}

impl FileSystem for StdFs {
    fn open(&self, path: &Path) -> io::Result<Box<dyn ReadHandle>> {
        Ok(Box::new(File::open(path)?))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn WriteHandle>> {
        Ok(Box::new(File::create(path)?))
    }
}
