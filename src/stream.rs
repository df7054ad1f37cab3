use crate::{
    common::PlaybackError,
    logging::{log_debug, log_trace},
    storage::{Storage, StorageFile},
};

/// Random-access byte source handed to a frame decoder
pub trait ByteSource {
    /// Fill `buf` from the current position, returning how many bytes were produced. A short
    /// count means the end of usable data is near; zero means there is none left.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Move to absolute `offset`, returning the position actually reached
    fn seek(&mut self, offset: u32) -> u32;

    /// Total length of the source in bytes
    fn size(&self) -> u32;

    /// Current logical position
    fn position(&self) -> u32;
}

/// File-like view of one storage resource.
///
/// Keeps its own logical `position`, resynchronized from the storage cursor after every
/// read and seek so the two can never drift apart.
pub struct FileStream<F: StorageFile> {
    file: Option<F>,
    size: u32,
    position: u32,
}

impl<F: StorageFile> FileStream<F> {
    /// Open `name` in `storage`
    pub fn open<S>(storage: &mut S, name: &str) -> Result<Self, PlaybackError>
    where
        S: Storage<File = F>,
    {
        let file = storage.open(name).ok_or(PlaybackError::ResourceNotFound)?;
        let size = file.size();
        log_debug!(name, size, "stream opened");
        Ok(Self {
            file: Some(file),
            size,
            position: 0,
        })
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Release the underlying resource. Closing twice is a no-op.
    pub fn close(&mut self) {
        if let Some(mut file) = self.file.take() {
            file.close();
            log_debug!(position = self.position, "stream closed");
        }
    }
}

impl<F: StorageFile> ByteSource for FileStream<F> {
    /// Reads stop one byte short of the end: whenever the request would reach or pass
    /// the last byte, only `remaining - 1` bytes are returned. Decoders that detect the
    /// end of data through a short read rely on this.
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let Some(file) = self.file.as_mut() else {
            return 0;
        };
        let requested = buf.len() as i64;
        let available = self.size as i64 - self.position as i64;
        let len = if available <= requested {
            available - 1
        } else {
            requested
        };
        if len <= 0 {
            return 0;
        }

        let read = file.read(&mut buf[..len as usize]);
        self.position = file.position();
        log_trace!(requested, read, position = self.position, "stream read");
        read
    }

    fn seek(&mut self, offset: u32) -> u32 {
        if let Some(file) = self.file.as_mut() {
            file.seek(offset);
            self.position = file.position();
            log_trace!(offset, position = self.position, "stream seek");
        }
        self.position
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn position(&self) -> u32 {
        self.position
    }
}

impl<F: StorageFile> Drop for FileStream<F> {
    fn drop(&mut self) {
        self.close();
    }
}
