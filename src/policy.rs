use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::SimError;
use crate::queue::{CircularQueue, LinearQueue};
use crate::table::PageTable;

/// Page-replacement algorithm, chosen once at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Fifo,
    Lru,
    Clock,
    Eclock,
}

impl Algorithm {
    /// Whether the algorithm tracks recency on a linear list (LRU) or sits
    /// on the circular ring (everything else)
    pub fn uses_linear_queue(self) -> bool {
        matches!(self, Algorithm::Lru)
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FIFO" => Ok(Algorithm::Fifo),
            "LRU" => Ok(Algorithm::Lru),
            "CLOCK" => Ok(Algorithm::Clock),
            "ECLOCK" => Ok(Algorithm::Eclock),
            _ => Err(format!(
                "unknown algorithm '{s}' (expected FIFO, LRU, CLOCK or ECLOCK)"
            )),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Fifo => "FIFO",
            Algorithm::Lru => "LRU",
            Algorithm::Clock => "CLOCK",
            Algorithm::Eclock => "ECLOCK",
        };
        f.write_str(name)
    }
}

/// The backing queue for the configured algorithm. Pages are admitted while
/// frames remain; after that, victim selection mutates node payloads in
/// place and the node count stays fixed.
pub enum ReplacementQueue {
    Linear(LinearQueue),
    Circular(CircularQueue),
}

impl ReplacementQueue {
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        if algorithm.uses_linear_queue() {
            ReplacementQueue::Linear(LinearQueue::new())
        } else {
            ReplacementQueue::Circular(CircularQueue::new())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReplacementQueue::Linear(q) => q.len(),
            ReplacementQueue::Circular(q) => q.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record a newly resident page while free frames remain
    pub fn admit(&mut self, vpn: u16) {
        match self {
            ReplacementQueue::Linear(q) => q.push_front(vpn),
            ReplacementQueue::Circular(q) => q.push(vpn),
        }
    }

    /// The uniform per-reference touch: LRU moves the page to the front,
    /// the circular disciplines ignore it.
    pub fn touch(&mut self, vpn: u16) {
        if let ReplacementQueue::Linear(q) = self {
            q.move_to_front(vpn);
        }
    }
}

impl Algorithm {
    /// Choose a victim page, overwrite its queue node's payload with
    /// `vpn`, and return the victim's VPN. Callers only invoke this once
    /// every frame is occupied, so the queue is full and non-empty.
    ///
    /// `fault_p1` is the faulting reference's outer index; the CLOCK and
    /// ECLOCK sweeps read R/M bits through it in two-level mode.
    pub fn select_victim(
        self,
        queue: &mut ReplacementQueue,
        table: &mut PageTable,
        fault_p1: u16,
        vpn: u16,
    ) -> Result<u16, SimError> {
        let victim = match (self, queue) {
            (Algorithm::Lru, ReplacementQueue::Linear(list)) => lru(list, vpn)?,
            (Algorithm::Fifo, ReplacementQueue::Circular(ring)) => fifo(ring, vpn)?,
            (Algorithm::Clock, ReplacementQueue::Circular(ring)) => {
                clock(ring, table, fault_p1, vpn)?
            }
            (Algorithm::Eclock, ReplacementQueue::Circular(ring)) => {
                eclock(ring, table, fault_p1, vpn)?
            }
            _ => return Err(SimError::Invariant("queue topology does not match algorithm")),
        };
        debug!("{self} evicts page 0x{victim:x} for page 0x{vpn:x}");
        Ok(victim)
    }
}

/// First-loaded, first-evicted: retreat the head to the oldest node and take
/// it, ignoring any recency information.
fn fifo(ring: &mut CircularQueue, vpn: u16) -> Result<u16, SimError> {
    ring.retreat();
    let victim = ring
        .head_data()
        .ok_or(SimError::Invariant("replacement ring is empty"))?;
    ring.set_head_data(vpn);
    Ok(victim)
}

/// The tail of the linear list is always the least-recently-used resident
/// page. Its payload is rewritten in place; the post-fault touch is what
/// lifts the node to the head.
fn lru(list: &mut LinearQueue, vpn: u16) -> Result<u16, SimError> {
    list.replace_tail(vpn)
        .ok_or(SimError::Invariant("replacement list is empty"))
}

/// Second-chance sweep: pages with the Referenced bit set get it cleared and
/// are skipped; the first unreferenced page is the victim. Every set bit is
/// cleared at most once per lap, so the sweep ends within two laps.
fn clock(
    ring: &mut CircularQueue,
    table: &mut PageTable,
    fault_p1: u16,
    vpn: u16,
) -> Result<u16, SimError> {
    ring.retreat();
    loop {
        let data = ring
            .head_data()
            .ok_or(SimError::Invariant("replacement ring is empty"))?;
        let slot = table.sweep_slot(data, fault_p1);
        if !table.entry(slot).referenced() {
            break;
        }
        table.set_referenced(slot, false);
        ring.retreat();
    }

    let victim = ring
        .head_data()
        .ok_or(SimError::Invariant("replacement ring is empty"))?;
    ring.set_head_data(vpn);
    Ok(victim)
}

/// Four-class NRU sweep over (Referenced, Modified), in priority order
/// (0,0), (0,1), (0,0), (0,1). The second pass clears every Referenced bit
/// it visits, so the later passes see R=0 everywhere and reduce to
/// preferring clean pages over dirty ones.
fn eclock(
    ring: &mut CircularQueue,
    table: &mut PageTable,
    fault_p1: u16,
    vpn: u16,
) -> Result<u16, SimError> {
    const CLASS_R: [bool; 4] = [false, false, false, false];
    const CLASS_M: [bool; 4] = [false, true, false, true];

    ring.retreat();
    let start = ring
        .head_handle()
        .ok_or(SimError::Invariant("replacement ring is empty"))?;

    let mut found = false;
    'passes: for pass in 0..CLASS_R.len() {
        loop {
            let data = ring
                .head_data()
                .ok_or(SimError::Invariant("replacement ring is empty"))?;
            let slot = table.sweep_slot(data, fault_p1);
            let entry = table.entry(slot);

            if entry.referenced() == CLASS_R[pass] && entry.modified() == CLASS_M[pass] {
                found = true;
                break 'passes;
            }
            if pass == 1 {
                table.set_referenced(slot, false);
            }

            ring.retreat();
            if ring.head_handle() == Some(start) {
                break;
            }
        }
    }

    if !found {
        return Err(SimError::ReplacementExhausted);
    }

    let victim = ring
        .head_data()
        .ok_or(SimError::Invariant("replacement ring is empty"))?;
    ring.set_head_data(vpn);
    Ok(victim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Slot, TableKind};

    fn full_ring(pages: &[u16]) -> CircularQueue {
        let mut ring = CircularQueue::new();
        for &vpn in pages {
            ring.push(vpn);
        }
        ring
    }

    /// Single-level table with the given pages resident in order
    fn resident_table(pages: &[u16]) -> PageTable {
        let mut table = PageTable::new(TableKind::SingleLevel, 4);
        for (pfn, &vpn) in pages.iter().enumerate() {
            let slot = Slot::Single(vpn);
            table.set_valid(slot, true);
            table.set_pfn(slot, pfn as u16);
        }
        table
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("FIFO".parse::<Algorithm>().unwrap(), Algorithm::Fifo);
        assert_eq!("ECLOCK".parse::<Algorithm>().unwrap(), Algorithm::Eclock);
        assert!("fifo".parse::<Algorithm>().is_err());
        assert!("MRU".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_fifo_order_law() {
        let mut queue = ReplacementQueue::Circular(full_ring(&[10, 11, 12, 13]));
        let mut table = resident_table(&[10, 11, 12, 13]);

        let mut evicted = Vec::new();
        for new_page in [20, 21, 22, 23] {
            let victim = Algorithm::Fifo
                .select_victim(&mut queue, &mut table, 0, new_page)
                .unwrap();
            evicted.push(victim);
        }
        // Eviction order equals insertion order
        assert_eq!(evicted, vec![10, 11, 12, 13]);
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn test_lru_takes_tail_and_keeps_node() {
        let mut list = LinearQueue::new();
        for vpn in [10, 11, 12, 13] {
            list.push_front(vpn);
        }
        let mut queue = ReplacementQueue::Linear(list);
        let mut table = resident_table(&[10, 11, 12, 13]);

        let victim = Algorithm::Lru
            .select_victim(&mut queue, &mut table, 0, 20)
            .unwrap();
        assert_eq!(victim, 10);

        // The node still sits at the tail until the touch lifts it
        let ReplacementQueue::Linear(list) = &queue else {
            unreachable!();
        };
        assert_eq!(list.tail_data(), Some(20));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_lru_recency_law() {
        let mut list = LinearQueue::new();
        for vpn in [10, 11, 12, 13] {
            list.push_front(vpn);
        }
        let mut queue = ReplacementQueue::Linear(list);
        let mut table = resident_table(&[10, 11, 12, 13]);

        // Re-access page 10: it becomes the most recent
        queue.touch(10);

        let victim = Algorithm::Lru
            .select_victim(&mut queue, &mut table, 0, 20)
            .unwrap();
        assert_eq!(victim, 11);
        queue.touch(20);

        // 10 survives until every other resident page has gone
        let victim = Algorithm::Lru
            .select_victim(&mut queue, &mut table, 0, 21)
            .unwrap();
        assert_eq!(victim, 12);
        queue.touch(21);
        let victim = Algorithm::Lru
            .select_victim(&mut queue, &mut table, 0, 22)
            .unwrap();
        assert_eq!(victim, 13);
        queue.touch(22);
        let victim = Algorithm::Lru
            .select_victim(&mut queue, &mut table, 0, 23)
            .unwrap();
        assert_eq!(victim, 10);
    }

    #[test]
    fn test_clock_skips_and_clears_referenced() {
        let mut queue = ReplacementQueue::Circular(full_ring(&[10, 11, 12, 13]));
        let mut table = resident_table(&[10, 11, 12, 13]);

        // Oldest two pages recently referenced, 12 not
        table.set_referenced(Slot::Single(10), true);
        table.set_referenced(Slot::Single(11), true);

        let victim = Algorithm::Clock
            .select_victim(&mut queue, &mut table, 0, 20)
            .unwrap();
        assert_eq!(victim, 12);

        // Skipped pages lost their second chance
        assert!(!table.entry(Slot::Single(10)).referenced());
        assert!(!table.entry(Slot::Single(11)).referenced());
    }

    #[test]
    fn test_clock_terminates_when_all_referenced() {
        let mut queue = ReplacementQueue::Circular(full_ring(&[10, 11, 12, 13]));
        let mut table = resident_table(&[10, 11, 12, 13]);
        for vpn in [10, 11, 12, 13] {
            table.set_referenced(Slot::Single(vpn), true);
        }

        // One full lap clears every bit; the second lap finds the oldest
        let victim = Algorithm::Clock
            .select_victim(&mut queue, &mut table, 0, 20)
            .unwrap();
        assert_eq!(victim, 10);
        for vpn in [11, 12, 13] {
            assert!(!table.entry(Slot::Single(vpn)).referenced());
        }
    }

    #[test]
    fn test_eclock_prefers_clean_unreferenced() {
        let mut queue = ReplacementQueue::Circular(full_ring(&[10, 11, 12, 13]));
        let mut table = resident_table(&[10, 11, 12, 13]);

        // (R,M): 10=(1,0) 11=(0,1) 12=(0,0) 13=(1,1)
        table.set_referenced(Slot::Single(10), true);
        table.set_modified(Slot::Single(11), true);
        table.set_referenced(Slot::Single(13), true);
        table.set_modified(Slot::Single(13), true);

        let victim = Algorithm::Eclock
            .select_victim(&mut queue, &mut table, 0, 20)
            .unwrap();
        assert_eq!(victim, 12);
    }

    #[test]
    fn test_eclock_falls_back_to_dirty() {
        let mut queue = ReplacementQueue::Circular(full_ring(&[10, 11, 12, 13]));
        let mut table = resident_table(&[10, 11, 12, 13]);

        // No (0,0) page exists; oldest (0,1) page wins
        for vpn in [10, 11, 12, 13] {
            table.set_modified(Slot::Single(vpn), true);
        }
        table.set_referenced(Slot::Single(10), true);

        let victim = Algorithm::Eclock
            .select_victim(&mut queue, &mut table, 0, 20)
            .unwrap();
        assert_eq!(victim, 11);
    }

    #[test]
    fn test_eclock_second_pass_clears_referenced() {
        let mut queue = ReplacementQueue::Circular(full_ring(&[10, 11, 12, 13]));
        let mut table = resident_table(&[10, 11, 12, 13]);

        // Everything referenced and dirty: pass one finds nothing, pass two
        // clears R bits as it sweeps and matches (0,1) on its second lap
        // position, i.e. the oldest node once its bit is gone.
        for vpn in [10, 11, 12, 13] {
            table.set_referenced(Slot::Single(vpn), true);
            table.set_modified(Slot::Single(vpn), true);
        }

        let victim = Algorithm::Eclock
            .select_victim(&mut queue, &mut table, 0, 20)
            .unwrap();
        assert_eq!(victim, 10);
    }
}
