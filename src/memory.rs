use crate::constants::*;

/// One resident page's worth of bytes
pub type Frame = [u8; PAGE_SIZE];

/// Physical memory: a fixed array of 64-byte frames indexed by PFN
pub struct PhysicalMemory {
    frames: Vec<Frame>,
}

impl PhysicalMemory {
    /// Create physical memory with `frame_count` zeroed frames
    pub fn new(frame_count: usize) -> Self {
        PhysicalMemory {
            frames: vec![[0u8; PAGE_SIZE]; frame_count],
        }
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Borrow a frame's content
    #[inline]
    pub fn frame(&self, pfn: u16) -> &Frame {
        &self.frames[pfn as usize]
    }

    /// Borrow a frame's content mutably (for swap-in)
    #[inline]
    pub fn frame_mut(&mut self, pfn: u16) -> &mut Frame {
        &mut self.frames[pfn as usize]
    }

    /// Read a single byte from a frame
    #[inline]
    pub fn read_byte(&self, pfn: u16, offset: u16) -> u8 {
        self.frames[pfn as usize][offset as usize]
    }

    /// Write a single byte into a frame
    #[inline]
    pub fn write_byte(&mut self, pfn: u16, offset: u16, value: u8) {
        self.frames[pfn as usize][offset as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_starts_zeroed() {
        let pm = PhysicalMemory::new(4);
        assert_eq!(pm.frame_count(), 4);
        assert_eq!(pm.read_byte(0, 0), 0);
        assert_eq!(pm.read_byte(3, (PAGE_SIZE - 1) as u16), 0);
    }

    #[test]
    fn test_byte_read_write() {
        let mut pm = PhysicalMemory::new(4);
        pm.write_byte(2, 17, 0xab);
        assert_eq!(pm.read_byte(2, 17), 0xab);
        // Neighbors untouched
        assert_eq!(pm.read_byte(2, 16), 0);
        assert_eq!(pm.read_byte(2, 18), 0);
        assert_eq!(pm.read_byte(1, 17), 0);
    }

    #[test]
    fn test_frame_overwrite() {
        let mut pm = PhysicalMemory::new(4);
        pm.frame_mut(1).copy_from_slice(&[0x5a; PAGE_SIZE]);
        assert_eq!(pm.frame(1), &[0x5a; PAGE_SIZE]);
        assert_eq!(pm.read_byte(1, 63), 0x5a);
    }
}
