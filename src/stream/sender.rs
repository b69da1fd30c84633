//! Timed writer for the canned NAL sequence.

use std::io;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::validation::MAX_FRAME_RATE;
use crate::config::StreamConfig;
use crate::nal::{FrameSchedule, NalUnit};

/// How a stream ended without an unexpected I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The peer went away (broken pipe, reset, ...).
    ClientDisconnected { frames_sent: u64 },
    /// Shutdown was signalled.
    Interrupted { frames_sent: u64 },
}

impl StreamOutcome {
    pub fn frames_sent(&self) -> u64 {
        match self {
            StreamOutcome::ClientDisconnected { frames_sent }
            | StreamOutcome::Interrupted { frames_sent } => *frames_sent,
        }
    }
}

/// Write failure that does not look like a disconnect.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("write failed after {frames_sent} frames: {source}")]
    Io {
        frames_sent: u64,
        #[source]
        source: io::Error,
    },
}

impl StreamError {
    pub fn frames_sent(&self) -> u64 {
        match self {
            StreamError::Io { frames_sent, .. } => *frames_sent,
        }
    }
}

/// Errors that mean the peer closed its end.
fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::WriteZero
            | io::ErrorKind::UnexpectedEof
    )
}

enum Step {
    Done,
    Interrupted,
}

/// Writes SPS, PPS, then one slice header per frame tick.
#[derive(Debug, Clone)]
pub struct FrameStreamer {
    schedule: FrameSchedule,
    frame_period: Duration,
    header_gap: Duration,
}

impl FrameStreamer {
    /// `frame_rate` is clamped to `1..=MAX_FRAME_RATE`.
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            schedule: FrameSchedule::from_config(config),
            frame_period: Duration::from_secs(1) / config.frame_rate.clamp(1, MAX_FRAME_RATE),
            header_gap: Duration::from_millis(config.header_gap_ms),
        }
    }

    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }

    /// Stream until the writer fails or `shutdown` fires.
    pub async fn stream<W>(
        &self,
        writer: &mut W,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<StreamOutcome, StreamError>
    where
        W: AsyncWrite + Unpin,
    {
        tracing::info!(
            frame_period_ms = self.frame_period.as_millis() as u64,
            "Sending test H.264 stream"
        );

        let mut frames_sent: u64 = 0;
        let finish = |result: io::Result<Step>, frames_sent: u64| match result {
            Ok(Step::Done) => None,
            Ok(Step::Interrupted) => Some(Ok(StreamOutcome::Interrupted { frames_sent })),
            Err(e) if is_disconnect(&e) => {
                tracing::debug!(error = %e, "Write failed, peer gone");
                Some(Ok(StreamOutcome::ClientDisconnected { frames_sent }))
            }
            Err(source) => Some(Err(StreamError::Io {
                frames_sent,
                source,
            })),
        };

        for unit in [NalUnit::Sps, NalUnit::Pps] {
            if let Some(end) = finish(write_unit(writer, unit, shutdown).await, 0) {
                return end;
            }
            tracing::debug!(nal_type = unit.nal_type().as_u8(), "Parameter set sent");
            if let Some(end) = finish(Ok(pause(self.header_gap, shutdown).await), 0) {
                return end;
            }
        }

        let mut ticker = time::interval(self.frame_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.recv() => return Ok(StreamOutcome::Interrupted { frames_sent }),
            }

            let frame = frames_sent;
            let unit = self.schedule.unit_for(frame);
            if let Some(end) = finish(write_unit(writer, unit, shutdown).await, frames_sent) {
                return end;
            }
            frames_sent += 1;

            if self.schedule.should_report(frame) {
                if unit.is_keyframe() {
                    tracing::info!(frame, "Sent frame (I-frame)");
                } else {
                    tracing::info!(frame, "Sent frame");
                }
            }
        }
    }
}

async fn write_unit<W>(
    writer: &mut W,
    unit: NalUnit,
    shutdown: &mut broadcast::Receiver<()>,
) -> io::Result<Step>
where
    W: AsyncWrite + Unpin,
{
    let write = async {
        writer.write_all(unit.bytes()).await?;
        writer.flush().await
    };
    tokio::select! {
        res = write => res.map(|_| Step::Done),
        _ = shutdown.recv() => Ok(Step::Interrupted),
    }
}

async fn pause(duration: Duration, shutdown: &mut broadcast::Receiver<()>) -> Step {
    tokio::select! {
        _ = time::sleep(duration) => Step::Done,
        _ = shutdown.recv() => Step::Interrupted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use crate::nal::{split_annexb, NalType, IDR, PPS, P_FRAME, SPS};
    use tokio::io::AsyncReadExt;

    fn fast_config() -> StreamConfig {
        StreamConfig {
            frame_rate: 1000,
            idr_interval: 3,
            progress_interval: 10,
            header_gap_ms: 1,
        }
    }

    #[test]
    fn frame_period_from_rate() {
        let streamer = FrameStreamer::new(&StreamConfig::default());
        assert_eq!(streamer.frame_period(), Duration::from_secs(1) / 30);
    }

    #[test]
    fn frame_rate_is_clamped() {
        let mut config = StreamConfig::default();
        config.frame_rate = 2_000_000_000;
        let fastest = FrameStreamer::new(&config).frame_period();
        assert_eq!(fastest, Duration::from_secs(1) / MAX_FRAME_RATE);
        assert!(!fastest.is_zero());

        config.frame_rate = 0;
        assert_eq!(FrameStreamer::new(&config).frame_period(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn oversized_frame_rate_still_streams() {
        let mut config = fast_config();
        config.frame_rate = 2_000_000_000;
        let streamer = FrameStreamer::new(&config);
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let (mut client, mut server) = tokio::io::duplex(256);

        let task = tokio::spawn(async move { streamer.stream(&mut server, &mut rx).await });

        let mut received = vec![0u8; SPS.len() + PPS.len() + IDR.len()];
        client.read_exact(&mut received).await.unwrap();
        assert_eq!(&received[SPS.len() + PPS.len()..], &IDR[..]);

        shutdown.trigger();
        let outcome = task.await.unwrap().unwrap();
        assert!(matches!(outcome, StreamOutcome::Interrupted { .. }));
    }

    #[tokio::test]
    async fn headers_then_gop_pattern() {
        let streamer = FrameStreamer::new(&fast_config());
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let (mut client, mut server) = tokio::io::duplex(256);

        let task = tokio::spawn(async move { streamer.stream(&mut server, &mut rx).await });

        let expected_len = SPS.len() + PPS.len() + IDR.len() + 2 * P_FRAME.len() + IDR.len();
        let mut received = vec![0u8; expected_len];
        client.read_exact(&mut received).await.unwrap();

        let types: Vec<_> = split_annexb(&received)
            .into_iter()
            .map(|unit| NalType::of_unit(unit).unwrap())
            .collect();
        assert_eq!(
            types,
            vec![
                NalType::Sps,
                NalType::Pps,
                NalType::IdrSlice,
                NalType::NonIdrSlice,
                NalType::NonIdrSlice,
                NalType::IdrSlice,
            ]
        );

        drop(client);
        let outcome = task.await.unwrap().unwrap();
        assert!(matches!(outcome, StreamOutcome::ClientDisconnected { .. }));
        assert!(outcome.frames_sent() >= 4);
    }

    #[tokio::test]
    async fn shutdown_interrupts_blocked_write() {
        let streamer = FrameStreamer::new(&fast_config());
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        // Too small for SPS: the first write stalls until the reader drains it.
        let (_client, mut server) = tokio::io::duplex(4);

        let task = tokio::spawn(async move { streamer.stream(&mut server, &mut rx).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.trigger();

        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, StreamOutcome::Interrupted { frames_sent: 0 });
    }

    #[tokio::test]
    async fn disconnect_before_headers() {
        let streamer = FrameStreamer::new(&fast_config());
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let (client, mut server) = tokio::io::duplex(64);
        drop(client);

        let outcome = streamer.stream(&mut server, &mut rx).await.unwrap();
        assert_eq!(outcome, StreamOutcome::ClientDisconnected { frames_sent: 0 });
    }

    #[test]
    fn disconnect_kinds() {
        assert!(is_disconnect(&io::Error::from(io::ErrorKind::BrokenPipe)));
        assert!(is_disconnect(&io::Error::from(io::ErrorKind::ConnectionReset)));
        assert!(!is_disconnect(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }
}
