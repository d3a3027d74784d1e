use std::fmt;

/// Read or write access, from the trace's `r`/`w` column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// One parsed trace line: `<mode> <hex-address> <hex-value>`. The value
/// byte only matters on writes and is ignored on reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    pub mode: AccessMode,
    pub address: u16,
    pub value: u16,
}

impl TraceRecord {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut tokens = line.split_whitespace();

        let mode = match tokens.next() {
            Some("r") => AccessMode::Read,
            Some("w") => AccessMode::Write,
            Some(other) => return Err(format!("invalid access mode '{other}'")),
            None => return Err("empty reference".to_string()),
        };

        let address = match tokens.next() {
            Some(tok) => u16::from_str_radix(tok, 16)
                .map_err(|_| format!("invalid hex address '{tok}'"))?,
            None => return Err("missing address".to_string()),
        };

        let value = match tokens.next() {
            Some(tok) => u16::from_str_radix(tok, 16)
                .map_err(|_| format!("invalid hex value '{tok}'"))?,
            None => return Err("missing value".to_string()),
        };

        if let Some(extra) = tokens.next() {
            return Err(format!("unexpected trailing token '{extra}'"));
        }

        Ok(TraceRecord { mode, address, value })
    }
}

/// The outcome of one processed reference, formatted as one output line:
/// `0x<vaddr> 0x<vpn-or-p1> 0x<0-or-p2> 0x<offset> 0x<pfn> 0x<paddr>` with
/// a trailing ` pgfault` marker when the reference faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessEvent {
    pub virtual_address: u16,
    /// `vpn` in single-level mode, `p1` in two-level mode
    pub page_field: u16,
    /// 0 in single-level mode, `p2` in two-level mode
    pub inner_field: u16,
    pub offset: u16,
    pub pfn: u16,
    pub physical_address: u16,
    pub fault: bool,
}

impl fmt::Display for AccessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:04x} 0x{:x} 0x{:x} 0x{:x} 0x{:x} 0x{:04x}",
            self.virtual_address,
            self.page_field,
            self.inner_field,
            self.offset,
            self.pfn,
            self.physical_address,
        )?;
        if self.fault {
            f.write_str(" pgfault")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read_reference() {
        let record = TraceRecord::parse("r 1234 0").unwrap();
        assert_eq!(record.mode, AccessMode::Read);
        assert_eq!(record.address, 0x1234);
        assert_eq!(record.value, 0);
    }

    #[test]
    fn test_parse_write_reference() {
        let record = TraceRecord::parse("w ffc0 ab").unwrap();
        assert_eq!(record.mode, AccessMode::Write);
        assert_eq!(record.address, 0xffc0);
        assert_eq!(record.value, 0xab);
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let record = TraceRecord::parse("  w  40  7f ").unwrap();
        assert_eq!(record.mode, AccessMode::Write);
        assert_eq!(record.address, 0x40);
        assert_eq!(record.value, 0x7f);
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(TraceRecord::parse("").is_err());
        assert!(TraceRecord::parse("x 1234 0").is_err());
        assert!(TraceRecord::parse("r zz 0").is_err());
        assert!(TraceRecord::parse("r 1234").is_err());
        assert!(TraceRecord::parse("r 1234 0 junk").is_err());
        assert!(TraceRecord::parse("r 12345 0").is_err()); // exceeds 16 bits
    }

    #[test]
    fn test_event_format_without_fault() {
        let event = AccessEvent {
            virtual_address: 0x1234,
            page_field: 0x48,
            inner_field: 0,
            offset: 0x34,
            pfn: 0x2,
            physical_address: 0x00b4,
            fault: false,
        };
        assert_eq!(event.to_string(), "0x1234 0x48 0x0 0x34 0x2 0x00b4");
    }

    #[test]
    fn test_event_format_with_fault() {
        let event = AccessEvent {
            virtual_address: 0x0040,
            page_field: 0x0,
            inner_field: 0x1,
            offset: 0x0,
            pfn: 0x1,
            physical_address: 0x0040,
            fault: true,
        };
        assert_eq!(event.to_string(), "0x0040 0x0 0x1 0x0 0x1 0x0040 pgfault");
    }
}
