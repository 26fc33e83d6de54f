//! RailDriver USB identifiers and report layout constants.
//!
//! The RailDriver desktop console is made by PI Engineering and enumerates
//! under their vendor ID with the consumer-control usage page. Identification
//! follows the vendor SDK heuristic: match the usage page first, then prefer
//! the known product ID, tolerating other PI Engineering products as an
//! equal-priority fallback.

/// PI Engineering USB vendor ID.
pub const PIE_VENDOR_ID: u16 = 0x05F3;

/// HID usage page the console enumerates under (consumer control).
pub const CONSUMER_USAGE_PAGE: u16 = 0x000C;

/// Known PI Engineering product IDs.
pub mod product_ids {
    /// RailDriver desktop train cab controller (PID 210).
    pub const RAILDRIVER: u16 = 0x00D2;
}

/// Canonical input/output report layout (44-button firmware revision).
///
/// All offsets are relative to a buffer that starts with the report ID byte.
/// The console uses report ID 0; some HID transports strip that leading zero
/// on reads, in which case the caller must restore it before decoding.
pub mod layout {
    /// Byte offset of the report ID (always 0, ignored by the decoder).
    pub const REPORT_ID: usize = 0;
    /// Byte offsets 1–7: the seven analog levers, in fixed order.
    pub const ANALOG_FIRST: usize = 1;
    /// Byte offsets 8–11: low 32 button bits, little-endian.
    pub const BUTTONS_LOW: usize = 8;
    /// Byte offsets 12–13: next 12 button bits, little-endian.
    /// The top 4 bits of this word are reserved and must be masked.
    pub const BUTTONS_HIGH: usize = 12;
    /// Total number of button bits carried by this revision.
    pub const BUTTON_BITS: u32 = 44;
}

/// Output command bytes carried in the console's output report.
pub mod commands {
    /// Drive the three-digit seven-segment speed display.
    pub const SPEED_DISPLAY: u8 = 134;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids() {
        assert_eq!(PIE_VENDOR_ID, 0x05F3);
        assert_eq!(product_ids::RAILDRIVER, 210);
        assert_eq!(CONSUMER_USAGE_PAGE, 0x0C);
    }
}
