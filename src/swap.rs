use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::constants::*;
use crate::memory::Frame;

/// Disk-backed swap store covering the whole virtual address space.
///
/// The file is `PAGE_SIZE * PAGE_COUNT` = 65536 bytes, addressed by
/// page-aligned offset `vpn * PAGE_SIZE`. An existing file is reused as-is,
/// so swap contents persist across runs; a missing file is created and
/// zero-filled.
pub struct SwapStore {
    file: std::fs::File,
}

impl SwapStore {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        match OpenOptions::new().read(true).write(true).open(path.as_ref()) {
            Ok(file) => Ok(SwapStore { file }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let mut file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .open(path.as_ref())?;
                file.write_all(&vec![0u8; SWAP_SIZE])?;
                Ok(SwapStore { file })
            }
            Err(e) => Err(e),
        }
    }

    /// Load one page into a frame, overwriting it entirely
    pub fn read_page(&mut self, vpn: u16, frame: &mut Frame) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(page_offset(vpn)))?;
        self.file.read_exact(frame)
    }

    /// Persist one frame at its page's slot
    pub fn write_page(&mut self, vpn: u16, frame: &Frame) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(page_offset(vpn)))?;
        self.file.write_all(frame)
    }
}

#[inline]
fn page_offset(vpn: u16) -> u64 {
    vpn as u64 * PAGE_SIZE as u64
}
