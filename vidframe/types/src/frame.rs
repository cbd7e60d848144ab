/*!
    Owned decoded frame.
*/

use std::time::Duration;

use crate::{DecodedFrame, PixelFormat, Pts, Rational};

/**
    A decoded picture copied out of the decoder into a contiguous buffer.

    Planes are stored back to back without padding, in the order given by
    [`PixelFormat::plane_size`].
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: Option<PixelFormat>,
    pub pts: Option<Pts>,
    pub dts: Option<Pts>,
    pub time_base: Rational,
    pub is_keyframe: bool,
}

impl VideoFrame {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        pts: Option<Pts>,
        time_base: Rational,
    ) -> Self {
        Self {
            data,
            width,
            height,
            format: Some(format),
            pts,
            dts: None,
            time_base,
            is_keyframe: false,
        }
    }

    /**
        Presentation time as wall-clock time, if known.
    */
    pub fn timestamp(&self) -> Option<Duration> {
        self.pts.and_then(|p| p.to_duration(self.time_base))
    }

    /**
        Borrow one plane of the packed buffer.
    */
    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        let format = self.format?;
        if index >= format.plane_count() {
            return None;
        }
        let offset: usize = (0..index)
            .map(|p| {
                let (row, rows) = format.plane_size(p, self.width, self.height);
                row * rows
            })
            .sum();
        let (row, rows) = format.plane_size(index, self.width, self.height);
        self.data.get(offset..offset + row * rows)
    }
}

impl Default for VideoFrame {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            width: 0,
            height: 0,
            format: None,
            pts: None,
            dts: None,
            time_base: Rational::new(1, 1),
            is_keyframe: false,
        }
    }
}

impl DecodedFrame for VideoFrame {
    fn empty() -> Self {
        Self::default()
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
    fn plane_slices_follow_layout() {
        let data: Vec<u8> = (0..24).collect();
        let frame = VideoFrame::new(
            data,
            4,
            4,
            PixelFormat::Yuv420p,
            Some(Pts(2)),
            Rational::new(1, 25),
        );

        assert_eq!(frame.plane(0).map(<[u8]>::len), Some(16));
        assert_eq!(frame.plane(1), Some(&[16u8, 17, 18, 19][..]));
        assert_eq!(frame.plane(2), Some(&[20u8, 21, 22, 23][..]));
        assert_eq!(frame.plane(3), None);
        assert_eq!(frame.timestamp(), Some(Duration::from_millis(80)));
    }

    #[test]
    fn empty_frame_has_no_planes() {
        let frame = <VideoFrame as DecodedFrame>::empty();
        assert_eq!(frame.plane(0), None);
        assert_eq!(frame.timestamp(), None);
    }
}
