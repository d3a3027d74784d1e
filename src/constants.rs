pub const VA_BITS: u32 = 16;
pub const OFFSET_BITS: u32 = 6;
pub const VPN_BITS: u32 = VA_BITS - OFFSET_BITS;
pub const VPN_P1_BITS: u32 = 5;
pub const VPN_P2_BITS: u32 = VPN_BITS - VPN_P1_BITS;

pub const PAGE_SIZE: usize = 1 << OFFSET_BITS;
pub const PAGE_COUNT: usize = 1 << VPN_BITS;
pub const SWAP_SIZE: usize = PAGE_SIZE * PAGE_COUNT;

pub const OUTER_TABLE_SIZE: usize = 1 << VPN_P1_BITS;
pub const INNER_TABLE_SIZE: usize = 1 << VPN_P2_BITS;

pub const MIN_FRAMES: usize = 4;
pub const MAX_FRAMES: usize = 128;

pub const V_BIT: u32 = 15;
pub const R_BIT: u32 = 14;
pub const M_BIT: u32 = 13;
