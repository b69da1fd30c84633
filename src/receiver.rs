//! Client side of the test stream.
//!
//! Reads a socket the way the Android receiver does: accumulate, cut at
//! start codes, log each unit's type and size.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::nal::{NalAccumulator, NalType};

/// Read buffer size, matching the receiver app.
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Counters for one receive session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiveReport {
    pub bytes_received: u64,
    pub units: u64,
    pub sps: u64,
    pub pps: u64,
    pub idr: u64,
    pub non_idr: u64,
    pub other: u64,
}

impl ReceiveReport {
    fn record(&mut self, unit: &[u8]) {
        let nal_type = NalType::of_unit(unit);
        tracing::info!(
            index = self.units,
            size = unit.len(),
            nal_type = nal_type.map(|t| t.as_u8()),
            "Extracted NAL unit"
        );

        self.units += 1;
        match nal_type {
            Some(NalType::Sps) => self.sps += 1,
            Some(NalType::Pps) => self.pps += 1,
            Some(NalType::IdrSlice) => self.idr += 1,
            Some(NalType::NonIdrSlice) => self.non_idr += 1,
            _ => self.other += 1,
        }
    }
}

/// Read units until EOF, or until `max_units` have been extracted.
///
/// On EOF the trailing unit is flushed and counted as well.
pub async fn receive_units<R>(
    reader: &mut R,
    max_units: Option<u64>,
) -> std::io::Result<ReceiveReport>
where
    R: AsyncRead + Unpin,
{
    let mut report = ReceiveReport::default();
    let mut accumulator = NalAccumulator::new();
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let done = |report: &ReceiveReport| max_units.is_some_and(|max| report.units >= max);

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            tracing::warn!(
                bytes_received = report.bytes_received,
                "Stream ended or connection closed"
            );
            if let Some(unit) = accumulator.finish() {
                report.record(&unit);
            }
            return Ok(report);
        }

        report.bytes_received += n as u64;
        tracing::trace!(bytes = n, total = report.bytes_received, "Read");

        for unit in accumulator.push(&buf[..n]) {
            report.record(&unit);
            if done(&report) {
                return Ok(report);
            }
        }
    }
}
