use crate::bits::{extract_bits, write_bits};
use crate::constants::*;

/// Represents the decomposed components of a 16-bit virtual address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub raw: u16,
    /// Virtual page number (high 10 bits)
    pub vpn: u16,
    /// Outer index for the two-level scheme (top 5 bits)
    pub p1: u16,
    /// Inner index for the two-level scheme (next 5 bits)
    pub p2: u16,
    /// Byte offset within the page (low 6 bits)
    pub offset: u16,
}

impl VirtualAddress {
    /// Decompose a raw VA into its components
    pub fn from_raw(raw: u16) -> Self {
        let vpn = extract_bits(raw, VPN_BITS, OFFSET_BITS);
        let p1 = extract_bits(raw, VPN_P1_BITS, OFFSET_BITS + VPN_P2_BITS);
        let p2 = extract_bits(raw, VPN_P2_BITS, OFFSET_BITS);
        let offset = extract_bits(raw, OFFSET_BITS, 0);

        VirtualAddress { raw, vpn, p1, p2, offset }
    }

    /// Compose the physical address: the VPN field replaced by the PFN,
    /// the offset carried through unchanged.
    #[inline]
    pub fn physical_address(&self, pfn: u16) -> u16 {
        write_bits(self.raw, VPN_BITS, OFFSET_BITS, pfn)
    }
}

impl std::fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VA(0x{:04x}) = (vpn={}, p1={}, p2={}, offset={})",
            self.raw, self.vpn, self.p1, self.p2, self.offset
        )
    }
}

/// Rebuild a full VPN from its two-level components
#[inline]
pub fn combine_vpn(p1: u16, p2: u16) -> u16 {
    (p1 << VPN_P2_BITS) | p2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_va_decomposition() {
        // 0x1234 = 0b0001_0010_0011_0100
        let va = VirtualAddress::from_raw(0x1234);

        assert_eq!(va.offset, 0x34);
        assert_eq!(va.vpn, 0x48);
        assert_eq!(va.p1, 0x2);
        assert_eq!(va.p2, 0x8);
    }

    #[test]
    fn test_two_level_invariant() {
        for raw in [0x0000u16, 0x1234, 0x8000, 0xffff, 0x0040, 0x0fc0] {
            let va = VirtualAddress::from_raw(raw);
            assert_eq!(va.vpn, combine_vpn(va.p1, va.p2));
        }
    }

    #[test]
    fn test_boundary_addresses() {
        let low = VirtualAddress::from_raw(0x0000);
        assert_eq!((low.vpn, low.offset), (0, 0));

        let high = VirtualAddress::from_raw(0xffff);
        assert_eq!(high.vpn, 0x3ff);
        assert_eq!(high.p1, 0x1f);
        assert_eq!(high.p2, 0x1f);
        assert_eq!(high.offset, 0x3f);
    }

    #[test]
    fn test_physical_address_composition() {
        let va = VirtualAddress::from_raw(0x1234);
        // PFN 3 replaces the VPN field, offset survives
        assert_eq!(va.physical_address(3), (3 << OFFSET_BITS) | 0x34);
        // PFN 0 leaves just the offset
        assert_eq!(va.physical_address(0), 0x34);
    }
}
