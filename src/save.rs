use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Byte offset of the high score record inside the storage.
pub const RECORD_OFFSET: usize = 1;
pub const RECORD_TAG: [u8; 4] = *b"2048";
pub const RECORD_SIZE: usize = RECORD_TAG.len() + 2;
pub const STORAGE_SIZE: usize = 64;

/// Erased non-volatile memory reads back as all ones.
const ERASED: u8 = 0xFF;

/// Byte-addressed non-volatile memory with explicit commits
pub trait Storage {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> io::Result<()>;

    /// Stages `data`; nothing is durable until [`Storage::commit`].
    fn write(&mut self, offset: usize, data: &[u8]) -> io::Result<()>;

    fn commit(&mut self) -> io::Result<()>;
}

fn span(len: usize, offset: usize, size: usize) -> io::Result<std::ops::Range<usize>> {
    match offset.checked_add(size) {
        Some(end) if end <= len => Ok(offset..end),
        _ => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("{} bytes at offset {} exceed storage of {} bytes", size, offset, len),
        )),
    }
}

#[derive(Debug, Clone)]
pub struct MemoryStorage {
    staged: Vec<u8>,
    committed: Vec<u8>,
}

impl MemoryStorage {
    pub fn new(size: usize) -> Self {
        Self::from_bytes(vec![ERASED; size])
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            staged: bytes.clone(),
            committed: bytes,
        }
    }

    pub fn committed(&self) -> &[u8] {
        &self.committed
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(STORAGE_SIZE)
    }
}

impl Storage for MemoryStorage {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> io::Result<()> {
        let range = span(self.staged.len(), offset, buf.len())?;

        buf.copy_from_slice(&self.staged[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> io::Result<()> {
        let range = span(self.staged.len(), offset, data.len())?;

        self.staged[range].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> io::Result<()> {
        self.committed.clone_from(&self.staged);
        Ok(())
    }
}

/// A flat image file standing in for the device EEPROM.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    data: Vec<u8>,
}

impl FileStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no save file at {}", path.display());
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        data.resize(STORAGE_SIZE, ERASED);

        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> io::Result<()> {
        let range = span(self.data.len(), offset, buf.len())?;

        buf.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> io::Result<()> {
        let range = span(self.data.len(), offset, data.len())?;

        self.data[range].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> io::Result<()> {
        fs::write(&self.path, &self.data)
    }
}

/// The persisted best score, guarded by a signature tag.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HighScore {
    pub value: u16,
}

impl HighScore {
    /// Reads the record, falling back to zero when it is missing or corrupt.
    pub fn load<S: Storage + ?Sized>(storage: &mut S) -> Self {
        let mut bytes = [0u8; RECORD_SIZE];

        if let Err(e) = storage.read(RECORD_OFFSET, &mut bytes) {
            warn!("Failed to read high score: {}", e);
            return Self::default();
        }

        match Self::decode(&bytes) {
            Some(record) => {
                info!("Loaded high score {}", record.value);
                record
            }
            None => {
                debug!("No valid high score record, starting from zero");
                Self::default()
            }
        }
    }

    pub fn decode(bytes: &[u8; RECORD_SIZE]) -> Option<Self> {
        let (tag, value) = bytes.split_at(RECORD_TAG.len());

        if tag != RECORD_TAG {
            return None;
        }

        Some(Self {
            value: u16::from_le_bytes([value[0], value[1]]),
        })
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        let (tag, value) = bytes.split_at_mut(RECORD_TAG.len());

        tag.copy_from_slice(&RECORD_TAG);
        value.copy_from_slice(&self.value.to_le_bytes());
        bytes
    }

    /// Records `score` if it beats the stored one, returning whether it did.
    pub fn save_if_improved<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        score: u32,
    ) -> io::Result<bool> {
        let value = u16::try_from(score).unwrap_or(u16::MAX);

        if value <= self.value {
            return Ok(false);
        }

        self.value = value;

        storage.write(RECORD_OFFSET, &self.encode())?;
        storage.commit()?;

        info!("New high score {}", self.value);

        Ok(true)
    }
}
