//! Canned H.264 NAL units.
//!
//! These are header-shaped byte strings only. They exercise a receiver's
//! start-code framing and type dispatch; they do not decode to a picture.

/// Annex-B 4-byte start code.
pub const START_CODE: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// Sequence parameter set.
pub const SPS: [u8; 20] = [
    0x00, 0x00, 0x00, 0x01, 0x67, 0x42, 0xc0, 0x1e, 0xd9, 0x00, 0xf0, 0x04, 0x4f, 0xcb, 0x80,
    0xb5, 0x01, 0x01, 0x01, 0x40,
];

/// Picture parameter set.
pub const PPS: [u8; 8] = [0x00, 0x00, 0x00, 0x01, 0x68, 0xce, 0x3c, 0x80];

/// IDR slice header (I-frame).
pub const IDR: [u8; 10] = [0x00, 0x00, 0x00, 0x01, 0x65, 0x88, 0x84, 0x00, 0x33, 0xff];

/// Non-IDR slice header (P-frame).
pub const P_FRAME: [u8; 9] = [0x00, 0x00, 0x00, 0x01, 0x41, 0x9a, 0x21, 0x8c, 0x48];

/// `nal_unit_type` field of a NAL header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NalType {
    NonIdrSlice,
    IdrSlice,
    Sps,
    Pps,
    Other(u8),
}

impl NalType {
    /// Decode from the first byte after the start code.
    pub fn from_header(header: u8) -> Self {
        match header & 0x1F {
            1 => NalType::NonIdrSlice,
            5 => NalType::IdrSlice,
            7 => NalType::Sps,
            8 => NalType::Pps,
            other => NalType::Other(other),
        }
    }

    /// Raw 5-bit type value.
    pub fn as_u8(&self) -> u8 {
        match self {
            NalType::NonIdrSlice => 1,
            NalType::IdrSlice => 5,
            NalType::Sps => 7,
            NalType::Pps => 8,
            NalType::Other(v) => *v,
        }
    }

    /// Type of a start-code-prefixed unit, if it has a header byte.
    pub fn of_unit(unit: &[u8]) -> Option<Self> {
        unit.strip_prefix(&START_CODE)
            .and_then(|rest| rest.first())
            .map(|&header| Self::from_header(header))
    }
}

/// One of the four canned units the server writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NalUnit {
    Sps,
    Pps,
    Idr,
    PFrame,
}

impl NalUnit {
    /// Wire bytes, start code included.
    pub fn bytes(&self) -> &'static [u8] {
        match self {
            NalUnit::Sps => &SPS,
            NalUnit::Pps => &PPS,
            NalUnit::Idr => &IDR,
            NalUnit::PFrame => &P_FRAME,
        }
    }

    pub fn nal_type(&self) -> NalType {
        NalType::from_header(self.bytes()[START_CODE.len()])
    }

    pub fn is_keyframe(&self) -> bool {
        matches!(self, NalUnit::Idr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_unit_starts_with_start_code() {
        for unit in [NalUnit::Sps, NalUnit::Pps, NalUnit::Idr, NalUnit::PFrame] {
            assert!(unit.bytes().starts_with(&START_CODE), "{unit:?}");
        }
    }

    #[test]
    fn header_types() {
        assert_eq!(NalUnit::Sps.nal_type(), NalType::Sps);
        assert_eq!(NalUnit::Pps.nal_type(), NalType::Pps);
        assert_eq!(NalUnit::Idr.nal_type(), NalType::IdrSlice);
        assert_eq!(NalUnit::PFrame.nal_type(), NalType::NonIdrSlice);
    }

    #[test]
    fn forbidden_and_nri_bits_are_masked() {
        // 0x65 = nri 3, type 5; 0xE5 sets the forbidden bit as well.
        assert_eq!(NalType::from_header(0x65), NalType::IdrSlice);
        assert_eq!(NalType::from_header(0xE5), NalType::IdrSlice);
        assert_eq!(NalType::from_header(0x06), NalType::Other(6));
        assert_eq!(NalType::Other(6).as_u8(), 6);
    }

    #[test]
    fn of_unit_needs_start_code_and_header() {
        assert_eq!(NalType::of_unit(&PPS), Some(NalType::Pps));
        assert_eq!(NalType::of_unit(&START_CODE), None);
        assert_eq!(NalType::of_unit(&[0x67, 0x42]), None);
    }
}
