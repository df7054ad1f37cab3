//! Named byte resources on device storage.
//!
//! [`Storage`] is the filesystem seen by the player and [`StorageFile`] one open resource in
//! it. Both are deliberately thin: failures never surface as errors, a failed read returns
//! zero bytes and a failed seek leaves the cursor where it was.

/// A store of named, read-only byte resources
pub trait Storage {
    /// Handle to one open resource
    type File: StorageFile;

    /// Whether `name` exists
    fn exists(&self, name: &str) -> bool;

    /// Open `name` for reading, positioned at byte 0
    fn open(&mut self, name: &str) -> Option<Self::File>;
}

/// One open resource
pub trait StorageFile {
    /// Length in bytes, fixed while the file is open
    fn size(&self) -> u32;

    /// Current cursor
    fn position(&self) -> u32;

    /// Read up to `buf.len()` bytes at the cursor, returning how many were read
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Move the cursor to `offset`. Returns `false` if the storage refused the move, in
    /// which case the cursor is unchanged.
    fn seek(&mut self, offset: u32) -> bool;

    /// Release the resource
    fn close(&mut self) {}
}

/// In-memory storage over a table of `(name, bytes)` pairs
#[derive(Clone, Copy)]
pub struct SliceStorage<'a> {
    entries: &'a [(&'a str, &'a [u8])],
}

impl<'a> SliceStorage<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a [u8])]) -> Self {
        Self { entries }
    }

    fn lookup(&self, name: &str) -> Option<&'a [u8]> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, bytes)| *bytes)
    }
}

impl<'a> Storage for SliceStorage<'a> {
    type File = SliceFile<'a>;

    fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn open(&mut self, name: &str) -> Option<SliceFile<'a>> {
        self.lookup(name).map(SliceFile::new)
    }
}

/// Cursor over a borrowed byte slice
#[derive(Clone)]
pub struct SliceFile<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> SliceFile<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }
}

impl StorageFile for SliceFile<'_> {
    fn size(&self) -> u32 {
        self.bytes.len() as u32
    }

    fn position(&self) -> u32 {
        self.cursor as u32
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let tail = &self.bytes[self.cursor..];
        let len = tail.len().min(buf.len());
        buf[..len].copy_from_slice(&tail[..len]);
        self.cursor += len;
        len
    }

    fn seek(&mut self, offset: u32) -> bool {
        let offset = offset as usize;
        if offset > self.bytes.len() {
            return false;
        }
        self.cursor = offset;
        true
    }
}

#[cfg(feature = "std")]
pub use self::fs::{FsFile, FsStorage};

#[cfg(feature = "std")]
mod fs {
    use std::{
        fs::File,
        io::{Read, Seek, SeekFrom},
        path::PathBuf,
    };

    use super::{Storage, StorageFile};
    use crate::logging::log_warn;

    /// Resources are the files under a root directory
    pub struct FsStorage {
        root: PathBuf,
    }

    impl FsStorage {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.root.join(name.trim_start_matches('/'))
        }
    }

    impl Storage for FsStorage {
        type File = FsFile;

        fn exists(&self, name: &str) -> bool {
            self.path(name).is_file()
        }

        fn open(&mut self, name: &str) -> Option<FsFile> {
            let file = match File::open(self.path(name)) {
                Ok(file) => file,
                Err(err) => {
                    log_warn!(name, %err, "open failed");
                    return None;
                }
            };
            let size = match file.metadata() {
                Ok(meta) => meta.len() as u32,
                Err(err) => {
                    log_warn!(name, %err, "metadata query failed");
                    return None;
                }
            };
            Some(FsFile {
                file: Some(file),
                size,
                cursor: 0,
            })
        }
    }

    pub struct FsFile {
        file: Option<File>,
        size: u32,
        cursor: u32,
    }

    impl FsFile {
        fn sync_cursor(&mut self) {
            if let Some(file) = self.file.as_mut() {
                match file.stream_position() {
                    Ok(pos) => self.cursor = pos as u32,
                    Err(err) => log_warn!(%err, "cursor query failed"),
                }
            }
        }
    }

    impl StorageFile for FsFile {
        fn size(&self) -> u32 {
            self.size
        }

        fn position(&self) -> u32 {
            self.cursor
        }

        fn read(&mut self, buf: &mut [u8]) -> usize {
            let Some(file) = self.file.as_mut() else {
                return 0;
            };
            let read = match file.read(buf) {
                Ok(read) => read,
                Err(err) => {
                    log_warn!(%err, "read failed");
                    0
                }
            };
            self.sync_cursor();
            read
        }

        fn seek(&mut self, offset: u32) -> bool {
            if offset > self.size {
                return false;
            }
            let Some(file) = self.file.as_mut() else {
                return false;
            };
            let moved = match file.seek(SeekFrom::Start(offset as u64)) {
                Ok(_) => true,
                Err(err) => {
                    log_warn!(%err, offset, "seek failed");
                    false
                }
            };
            self.sync_cursor();
            moved
        }

        fn close(&mut self) {
            self.file = None;
        }
    }
}
