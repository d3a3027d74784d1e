use crate::bits::{extract_bits, pfn_width, write_bits, Pte};
use crate::constants::*;
use crate::translation::{combine_vpn, VirtualAddress};

/// Which page-table topology the simulation runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    SingleLevel,
    TwoLevel,
}

/// Handle to one concrete page table entry.
///
/// For the two-level table the handle names the inner table the entry lives
/// in, so later bit updates and eviction bookkeeping reach the right word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Single(u16),
    Inner { p1: u16, p2: u16 },
}

enum Tables {
    /// Flat array of 1024 entries indexed by VPN
    Single(Vec<Pte>),
    /// 32 outer entries plus lazily allocated 32-entry inner tables
    Two {
        outer: Vec<Pte>,
        inner: Vec<Option<Vec<Pte>>>,
    },
}

pub struct PageTable {
    tables: Tables,
    pfn_bits: u32,
}

impl PageTable {
    /// Create a table of the given topology, all entries invalid,
    /// with the PFN field sized for `frame_count` frames.
    pub fn new(kind: TableKind, frame_count: usize) -> Self {
        let tables = match kind {
            TableKind::SingleLevel => Tables::Single(vec![Pte::default(); PAGE_COUNT]),
            TableKind::TwoLevel => Tables::Two {
                outer: vec![Pte::default(); OUTER_TABLE_SIZE],
                inner: (0..OUTER_TABLE_SIZE).map(|_| None).collect(),
            },
        };
        PageTable {
            tables,
            pfn_bits: pfn_width(frame_count),
        }
    }

    pub fn kind(&self) -> TableKind {
        match self.tables {
            Tables::Single(_) => TableKind::SingleLevel,
            Tables::Two { .. } => TableKind::TwoLevel,
        }
    }

    /// Locate the entry for a virtual address. In two-level mode the inner
    /// table is allocated and zero-initialized on first touch; the outer
    /// entry then gets its allocated bit set and its own index written into
    /// its low bits (flush bookkeeping only).
    pub fn slot_of(&mut self, va: &VirtualAddress) -> Slot {
        match &mut self.tables {
            Tables::Single(_) => Slot::Single(va.vpn),
            Tables::Two { outer, inner } => {
                let p1 = va.p1 as usize;
                if !outer[p1].valid() && inner[p1].is_none() {
                    inner[p1] = Some(vec![Pte::default(); INNER_TABLE_SIZE]);
                    outer[p1].set_valid(true);
                    let raw = write_bits(outer[p1].raw(), VPN_P1_BITS, 0, va.p1);
                    outer[p1] = Pte::from_raw(raw);
                }
                Slot::Inner { p1: va.p1, p2: va.p2 }
            }
        }
    }

    /// Handle to the entry owning a full VPN, without allocation. Used to
    /// reach a victim's own table after replacement selected it.
    pub fn slot_of_vpn(&self, vpn: u16) -> Slot {
        match self.tables {
            Tables::Single(_) => Slot::Single(vpn),
            Tables::Two { .. } => Slot::Inner {
                p1: extract_bits(vpn, VPN_P1_BITS, VPN_P2_BITS),
                p2: extract_bits(vpn, VPN_P2_BITS, 0),
            },
        }
    }

    /// Handle used by the CLOCK/ECLOCK sweeps for a queue node's payload.
    ///
    /// Single-level: the payload is the VPN. Two-level: the payload's low
    /// 5 bits index into the faulting reference's inner table (`fault_p1`);
    /// the victim's own table is consulted only after selection, via
    /// `slot_of_vpn`.
    pub fn sweep_slot(&self, node_vpn: u16, fault_p1: u16) -> Slot {
        match self.tables {
            Tables::Single(_) => Slot::Single(node_vpn),
            Tables::Two { .. } => Slot::Inner {
                p1: fault_p1,
                p2: extract_bits(node_vpn, VPN_P2_BITS, 0),
            },
        }
    }

    /// Read the entry a slot points at. Slots for never-allocated inner
    /// tables read as an all-zero (invalid) entry.
    pub fn entry(&self, slot: Slot) -> Pte {
        match (&self.tables, slot) {
            (Tables::Single(entries), Slot::Single(vpn)) => entries[vpn as usize],
            (Tables::Two { inner, .. }, Slot::Inner { p1, p2 }) => inner[p1 as usize]
                .as_ref()
                .map_or(Pte::default(), |t| t[p2 as usize]),
            _ => Pte::default(),
        }
    }

    pub fn pfn(&self, slot: Slot) -> u16 {
        self.entry(slot).pfn(self.pfn_bits)
    }

    pub fn set_valid(&mut self, slot: Slot, valid: bool) {
        self.with_entry(slot, |e| e.set_valid(valid));
    }

    pub fn set_referenced(&mut self, slot: Slot, referenced: bool) {
        self.with_entry(slot, |e| e.set_referenced(referenced));
    }

    pub fn set_modified(&mut self, slot: Slot, modified: bool) {
        self.with_entry(slot, |e| e.set_modified(modified));
    }

    pub fn set_pfn(&mut self, slot: Slot, pfn: u16) {
        let width = self.pfn_bits;
        self.with_entry(slot, |e| e.set_pfn(width, pfn));
    }

    fn with_entry(&mut self, slot: Slot, f: impl FnOnce(&mut Pte)) {
        match (&mut self.tables, slot) {
            (Tables::Single(entries), Slot::Single(vpn)) => f(&mut entries[vpn as usize]),
            (Tables::Two { inner, .. }, Slot::Inner { p1, p2 }) => {
                if let Some(table) = inner[p1 as usize].as_mut() {
                    f(&mut table[p2 as usize]);
                }
            }
            _ => {}
        }
    }

    /// Aging sweep: clear the Referenced bit of every instantiated entry.
    /// Never-allocated inner tables hold no entries and are skipped.
    pub fn clear_referenced_bits(&mut self) {
        match &mut self.tables {
            Tables::Single(entries) => {
                for entry in entries.iter_mut() {
                    entry.set_referenced(false);
                }
            }
            Tables::Two { inner, .. } => {
                for table in inner.iter_mut().flatten() {
                    for entry in table.iter_mut() {
                        entry.set_referenced(false);
                    }
                }
            }
        }
    }

    /// Every currently Valid page as `(vpn, pfn)`, for the shutdown flush.
    pub fn resident_pages(&self) -> Vec<(u16, u16)> {
        let mut pages = Vec::new();
        match &self.tables {
            Tables::Single(entries) => {
                for (vpn, entry) in entries.iter().enumerate() {
                    if entry.valid() {
                        pages.push((vpn as u16, entry.pfn(self.pfn_bits)));
                    }
                }
            }
            Tables::Two { outer, inner } => {
                for (p1, outer_entry) in outer.iter().enumerate() {
                    if !outer_entry.valid() {
                        continue;
                    }
                    if let Some(table) = inner[p1].as_ref() {
                        for (p2, entry) in table.iter().enumerate() {
                            if entry.valid() {
                                let vpn = combine_vpn(p1 as u16, p2 as u16);
                                pages.push((vpn, entry.pfn(self.pfn_bits)));
                            }
                        }
                    }
                }
            }
        }
        pages
    }
}
