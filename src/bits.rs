use crate::constants::*;

/// Extract a `width`-bit field starting at bit `pos` from a 16-bit word.
#[inline]
pub fn extract_bits(value: u16, width: u32, pos: u32) -> u16 {
    (value >> pos) & (((1u32 << width) - 1) as u16)
}

/// Overwrite a `width`-bit field starting at bit `pos` with `field`,
/// leaving all other bits untouched.
#[inline]
pub fn write_bits(value: u16, width: u32, pos: u32, field: u16) -> u16 {
    let mask = (((1u32 << width) - 1) as u16) << pos;
    (value & !mask) | ((field << pos) & mask)
}

/// Number of bits needed to hold a physical frame number for `frame_count`
/// frames, i.e. ceil(log2(frame_count)).
#[inline]
pub fn pfn_width(frame_count: usize) -> u32 {
    usize::BITS - (frame_count - 1).leading_zeros()
}

/// A 16-bit packed page table entry.
///
/// Bit 15 = Valid, bit 14 = Referenced, bit 13 = Modified; the low
/// `pfn_width(frame_count)` bits hold the physical frame number, which is
/// meaningful only while Valid is set. The same word doubles as a
/// two-level outer entry, where Valid means "inner table allocated".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pte(u16);

impl Pte {
    pub fn from_raw(raw: u16) -> Self {
        Pte(raw)
    }

    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn valid(self) -> bool {
        extract_bits(self.0, 1, V_BIT) == 1
    }

    #[inline]
    pub fn referenced(self) -> bool {
        extract_bits(self.0, 1, R_BIT) == 1
    }

    #[inline]
    pub fn modified(self) -> bool {
        extract_bits(self.0, 1, M_BIT) == 1
    }

    #[inline]
    pub fn pfn(self, width: u32) -> u16 {
        extract_bits(self.0, width, 0)
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.0 = write_bits(self.0, 1, V_BIT, valid as u16);
    }

    pub fn set_referenced(&mut self, referenced: bool) {
        self.0 = write_bits(self.0, 1, R_BIT, referenced as u16);
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.0 = write_bits(self.0, 1, M_BIT, modified as u16);
    }

    pub fn set_pfn(&mut self, width: u32, pfn: u16) {
        self.0 = write_bits(self.0, width, 0, pfn);
    }
}
