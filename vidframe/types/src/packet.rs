/*!
    Owned compressed packet.
*/

use crate::{EncodedPacket, MediaDuration, Pts, Rational};

/**
    A compressed packet that owns its data.

    Backends hand out their own packet types for zero-copy decoding; this is
    the detached form given to collaborators that keep packets around, such
    as a remuxer.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    /// Compressed payload.
    pub data: Vec<u8>,
    /// Index of the stream this packet belongs to.
    pub stream_index: usize,
    pub pts: Option<Pts>,
    pub dts: Option<Pts>,
    pub duration: MediaDuration,
    /// Time base of `pts`, `dts` and `duration`.
    pub time_base: Rational,
    pub is_keyframe: bool,
}

impl Packet {
    pub fn new(data: Vec<u8>, stream_index: usize, time_base: Rational) -> Self {
        Self {
            data,
            stream_index,
            pts: None,
            dts: None,
            duration: MediaDuration::default(),
            time_base,
            is_keyframe: false,
        }
    }

    pub fn with_pts(mut self, pts: i64) -> Self {
        self.pts = Some(Pts(pts));
        self
    }

    pub fn with_dts(mut self, dts: i64) -> Self {
        self.dts = Some(Pts(dts));
        self
    }

    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = MediaDuration(duration);
        self
    }

    pub fn with_keyframe(mut self, is_keyframe: bool) -> Self {
        self.is_keyframe = is_keyframe;
        self
    }

    /**
        Move all timing fields into another time base.
    */
    pub fn rescale_ts(&mut self, to: Rational) {
        let from = self.time_base;
        self.pts = self.pts.map(|p| p.rescale(from, to));
        self.dts = self.dts.map(|d| d.rescale(from, to));
        self.duration = self.duration.rescale(from, to);
        self.time_base = to;
    }
}

impl EncodedPacket for Packet {
    fn stream_index(&self) -> usize {
        self.stream_index
    }

    fn pts(&self) -> Option<Pts> {
        self.pts
    }

    fn dts(&self) -> Option<Pts> {
        self.dts
    }

    fn is_keyframe(&self) -> bool {
        self.is_keyframe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_ts_moves_every_timing_field() {
        let mut packet = Packet::new(vec![0, 0, 1], 0, Rational::new(1, 90_000))
            .with_pts(3003)
            .with_dts(0)
            .with_duration(3003)
            .with_keyframe(true);

        packet.rescale_ts(Rational::new(1, 1000));

        assert_eq!(packet.pts, Some(Pts(33)));
        assert_eq!(packet.dts, Some(Pts(0)));
        assert_eq!(packet.duration, MediaDuration(33));
        assert_eq!(packet.time_base, Rational::new(1, 1000));
        assert!(packet.is_keyframe);
    }

    #[test]
    fn rescale_ts_keeps_missing_timestamps_missing() {
        let mut packet = Packet::new(Vec::new(), 1, Rational::new(1, 25));
        packet.rescale_ts(Rational::new(1, 1000));
        assert_eq!(packet.pts, None);
        assert_eq!(packet.dts, None);
    }
}
