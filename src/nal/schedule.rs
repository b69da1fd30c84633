//! Which unit goes out on which frame, and which frames get logged.

use crate::config::StreamConfig;
use crate::nal::units::NalUnit;

/// Fixed GOP pattern: one IDR followed by `idr_interval - 1` P-frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSchedule {
    idr_interval: u64,
    progress_interval: u64,
}

impl FrameSchedule {
    /// Intervals of zero are treated as one.
    pub fn new(idr_interval: u32, progress_interval: u32) -> Self {
        Self {
            idr_interval: u64::from(idr_interval.max(1)),
            progress_interval: u64::from(progress_interval.max(1)),
        }
    }

    pub fn from_config(config: &StreamConfig) -> Self {
        Self::new(config.idr_interval, config.progress_interval)
    }

    pub fn unit_for(&self, frame: u64) -> NalUnit {
        if frame % self.idr_interval == 0 {
            NalUnit::Idr
        } else {
            NalUnit::PFrame
        }
    }

    /// Every keyframe is reported, plus every `progress_interval`-th frame.
    pub fn should_report(&self, frame: u64) -> bool {
        self.unit_for(frame).is_keyframe() || frame % self.progress_interval == 0
    }
}

impl Default for FrameSchedule {
    fn default() -> Self {
        Self::from_config(&StreamConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idr_every_thirty_frames() {
        let schedule = FrameSchedule::default();
        assert_eq!(schedule.unit_for(0), NalUnit::Idr);
        assert_eq!(schedule.unit_for(1), NalUnit::PFrame);
        assert_eq!(schedule.unit_for(29), NalUnit::PFrame);
        assert_eq!(schedule.unit_for(30), NalUnit::Idr);
        assert_eq!(schedule.unit_for(60), NalUnit::Idr);
    }

    #[test]
    fn reports_keyframes_and_every_tenth() {
        let schedule = FrameSchedule::default();
        let reported: Vec<u64> = (0..45).filter(|&f| schedule.should_report(f)).collect();
        assert_eq!(reported, vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn keyframes_reported_off_the_progress_grid() {
        let schedule = FrameSchedule::new(7, 10);
        assert!(schedule.should_report(7));
        assert!(schedule.should_report(10));
        assert!(!schedule.should_report(8));
    }

    #[test]
    fn zero_intervals_clamp_to_one() {
        let schedule = FrameSchedule::new(0, 0);
        assert_eq!(schedule.unit_for(3), NalUnit::Idr);
        assert!(schedule.should_report(3));
    }
}
