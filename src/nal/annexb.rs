//! Annex-B start-code splitting, as a receiver would do it.
//!
//! Only the 4-byte start code is recognised; everything the server
//! writes uses it.
//!
//! [`split_annexb`] works on a complete buffer. [`NalAccumulator`] works
//! on a live socket: it hands out a unit only once the next start code
//! has arrived, and keeps the incomplete tail for the next read.

use crate::nal::units::START_CODE;

/// Find the next 4-byte start code at or after `from`.
fn find_start_code(data: &[u8], from: usize) -> Option<usize> {
    if data.len() < START_CODE.len() {
        return None;
    }
    (from..=data.len() - START_CODE.len()).find(|&i| data[i..i + START_CODE.len()] == START_CODE)
}

/// Split a buffer into NAL units, each keeping its leading start code.
///
/// Bytes before the first start code are dropped. The final unit runs to
/// the end of the buffer, so it may be incomplete on a live stream.
pub fn split_annexb(data: &[u8]) -> Vec<&[u8]> {
    let mut units = Vec::new();
    let Some(mut start) = find_start_code(data, 0) else {
        return units;
    };

    while let Some(next) = find_start_code(data, start + START_CODE.len()) {
        units.push(&data[start..next]);
        start = next;
    }
    units.push(&data[start..]);
    units
}

/// Incremental start-code framer for a byte stream.
#[derive(Debug, Default)]
pub struct NalAccumulator {
    buf: Vec<u8>,
    /// `buf` begins with a start code.
    synced: bool,
    /// Earliest offset where an unseen start code could begin.
    scan_from: usize,
}

impl NalAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data` and return every unit it completed, start code included.
    ///
    /// Units with no header byte are dropped. Bytes before the first start
    /// code are discarded.
    pub fn push(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        self.buf.extend_from_slice(data);
        let mut units = Vec::new();

        if !self.synced {
            match find_start_code(&self.buf, 0) {
                Some(pos) => {
                    self.buf.drain(..pos);
                    self.synced = true;
                    self.scan_from = START_CODE.len();
                }
                None => {
                    // A start code may straddle this read and the next one.
                    let keep_from = self.buf.len().saturating_sub(START_CODE.len() - 1);
                    self.buf.drain(..keep_from);
                    return units;
                }
            }
        }

        while let Some(next) = find_start_code(&self.buf, self.scan_from) {
            let unit: Vec<u8> = self.buf.drain(..next).collect();
            self.scan_from = START_CODE.len();
            if unit.len() > START_CODE.len() {
                units.push(unit);
            }
        }

        self.scan_from = self
            .buf
            .len()
            .saturating_sub(START_CODE.len() - 1)
            .max(START_CODE.len());
        units
    }

    /// Bytes held back waiting for the next start code.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Flush the trailing unit once the stream has ended.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        let tail = std::mem::take(&mut self.buf);
        let synced = std::mem::replace(&mut self.synced, false);
        self.scan_from = 0;
        (synced && tail.len() > START_CODE.len()).then_some(tail)
    }
}
