use std::io::{BufRead, Write};

use log::{debug, warn};

use crate::error::{Result, SimError};
use crate::io::{AccessEvent, AccessMode, TraceRecord};
use crate::memory::PhysicalMemory;
use crate::policy::{Algorithm, ReplacementQueue};
use crate::swap::SwapStore;
use crate::table::{PageTable, TableKind};
use crate::translation::VirtualAddress;

/// Validated simulation parameters, handed in by the configuration layer
#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    pub table_kind: TableKind,
    /// Number of physical frames, 4..=128
    pub frame_count: usize,
    pub algorithm: Algorithm,
    /// References between aging sweeps; 0 disables aging
    pub tick: u64,
    /// Skip malformed trace lines with a warning instead of aborting
    pub skip_bad_lines: bool,
}

/// The whole simulation state: page table, physical memory, swap store,
/// replacement queue and counters, owned for the run's duration.
pub struct Simulation {
    table: PageTable,
    memory: PhysicalMemory,
    swap: SwapStore,
    queue: ReplacementQueue,
    algorithm: Algorithm,
    tick: u64,
    tick_counter: u64,
    fault_count: u64,
    resident_frames: usize,
}

impl Simulation {
    pub fn new(options: &SimOptions, swap: SwapStore) -> Self {
        Simulation {
            table: PageTable::new(options.table_kind, options.frame_count),
            memory: PhysicalMemory::new(options.frame_count),
            swap,
            queue: ReplacementQueue::for_algorithm(options.algorithm),
            algorithm: options.algorithm,
            tick: options.tick,
            tick_counter: 0,
            fault_count: 0,
            resident_frames: 0,
        }
    }

    pub fn fault_count(&self) -> u64 {
        self.fault_count
    }

    /// Run one reference through the translate / fault / access / age
    /// state machine and report what happened.
    pub fn process(&mut self, record: &TraceRecord) -> Result<AccessEvent> {
        let va = VirtualAddress::from_raw(record.address);
        let slot = self.table.slot_of(&va);

        let fault = !self.table.entry(slot).valid();
        if fault {
            self.fault_count += 1;
            let pfn = self.assign_frame(&va)?;

            self.table.set_valid(slot, true);
            self.table.set_modified(slot, false);
            self.table.set_referenced(slot, true);
            self.table.set_pfn(slot, pfn);

            // Pull the page in unconditionally, replacing whatever the
            // frame held before
            self.swap.read_page(va.vpn, self.memory.frame_mut(pfn))?;
        }

        // Uniform touch: only LRU reorders, fault or not
        self.queue.touch(va.vpn);
        self.table.set_referenced(slot, true);

        let pfn = self.table.pfn(slot);
        if record.mode == AccessMode::Write {
            self.memory.write_byte(pfn, va.offset, record.value as u8);
            self.table.set_modified(slot, true);
        }

        let event = self.log_event(&va, pfn, fault);
        self.advance_aging();
        Ok(event)
    }

    /// Find a frame for a faulting page: the next free frame during the
    /// initial fill, otherwise the configured policy's victim. A dirty
    /// victim is written back before its frame is reused.
    fn assign_frame(&mut self, va: &VirtualAddress) -> Result<u16> {
        if self.resident_frames < self.memory.frame_count() {
            self.queue.admit(va.vpn);
            let pfn = self.resident_frames as u16;
            self.resident_frames += 1;
            debug!("page 0x{:x} fills free frame {pfn}", va.vpn);
            return Ok(pfn);
        }

        let victim_vpn =
            self.algorithm
                .select_victim(&mut self.queue, &mut self.table, va.p1, va.vpn)?;
        let victim_slot = self.table.slot_of_vpn(victim_vpn);
        let pfn = self.table.pfn(victim_slot);

        if self.table.entry(victim_slot).modified() {
            self.swap.write_page(victim_vpn, self.memory.frame(pfn))?;
        }
        self.table.set_valid(victim_slot, false);
        Ok(pfn)
    }

    fn log_event(&self, va: &VirtualAddress, pfn: u16, fault: bool) -> AccessEvent {
        let (page_field, inner_field) = match self.table.kind() {
            TableKind::SingleLevel => (va.vpn, 0),
            TableKind::TwoLevel => (va.p1, va.p2),
        };
        AccessEvent {
            virtual_address: va.raw,
            page_field,
            inner_field,
            offset: va.offset,
            pfn,
            physical_address: va.physical_address(pfn),
            fault,
        }
    }

    /// Aging clock: one step per reference; on reaching the tick the whole
    /// table's Referenced bits are cleared. A tick of 0 never fires, since
    /// the counter increments before the comparison.
    fn advance_aging(&mut self) {
        self.tick_counter += 1;
        if self.tick_counter == self.tick {
            self.table.clear_referenced_bits();
            self.tick_counter = 0;
        }
    }

    /// End-of-trace flush: every resident page's frame goes back to the
    /// swap store, dirty or not.
    pub fn flush(&mut self) -> Result<()> {
        for (vpn, pfn) in self.table.resident_pages() {
            self.swap.write_page(vpn, self.memory.frame(pfn))?;
        }
        Ok(())
    }
}

/// Replay a whole trace: one log line per reference, a flush of resident
/// pages at end of input, and the fault total as the final line. Returns
/// the fault count.
pub fn run<R: BufRead, W: Write>(
    options: &SimOptions,
    trace: R,
    swap: SwapStore,
    mut output: W,
) -> Result<u64> {
    let mut sim = Simulation::new(options, swap);

    for (index, line) in trace.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = match TraceRecord::parse(&line) {
            Ok(record) => record,
            Err(reason) if options.skip_bad_lines => {
                warn!("skipping trace line {}: {reason}", index + 1);
                continue;
            }
            Err(reason) => {
                return Err(SimError::Parse {
                    line: index + 1,
                    reason,
                })
            }
        };

        let event = sim.process(&record)?;
        writeln!(output, "{event}")?;
    }

    sim.flush()?;
    write!(output, "\n TOTAL NUMBER OF PAGE FAULTS: {}\n", sim.fault_count())?;
    output.flush()?;

    Ok(sim.fault_count())
}
