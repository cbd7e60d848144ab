/*!
    Pixel format types.
*/

/**
    Decoded picture pixel formats.

    This is the subset of formats decoders commonly produce. Frames in any
    other format can still be pulled through the pipeline, they just can't be
    copied out into an owned [`VideoFrame`](crate::VideoFrame).
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, 12bpp
    Yuv420p,
    /// Planar YUV 4:2:0, full range (JPEG)
    Yuvj420p,
    /// Planar YUV 4:2:2, 16bpp
    Yuv422p,
    /// Planar YUV 4:4:4, 24bpp
    Yuv444p,
    /// Planar YUV 4:2:0, 10-bit little-endian
    Yuv420p10,
    /// Semi-planar YUV 4:2:0, 12bpp
    Nv12,
    /// 8-bit grayscale
    Gray8,
    /// Packed RGB, 24bpp
    Rgb24,
    /// Packed BGR, 24bpp
    Bgr24,
    /// Packed RGBA, 32bpp
    Rgba,
    /// Packed BGRA, 32bpp
    Bgra,
}

impl PixelFormat {
    /**
        Number of planes a frame of this format carries.
    */
    pub const fn plane_count(self) -> usize {
        match self {
            Self::Yuv420p | Self::Yuvj420p | Self::Yuv422p | Self::Yuv444p | Self::Yuv420p10 => 3,
            Self::Nv12 => 2,
            Self::Gray8 | Self::Rgb24 | Self::Bgr24 | Self::Rgba | Self::Bgra => 1,
        }
    }

    /**
        Bytes per sample within a plane.
    */
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::Yuv420p10 => 2,
            _ => 1,
        }
    }

    /**
        Visible row width in bytes and row count of `plane` for a picture of
        the given dimensions. Chroma dimensions round up for odd sizes.
    */
    pub const fn plane_size(self, plane: usize, width: u32, height: u32) -> (usize, usize) {
        let w = width as usize;
        let h = height as usize;
        let half_w = w.div_ceil(2);
        let half_h = h.div_ceil(2);
        let bps = self.bytes_per_sample();

        match (self, plane) {
            (Self::Rgb24 | Self::Bgr24, 0) => (w * 3, h),
            (Self::Rgba | Self::Bgra, 0) => (w * 4, h),
            (Self::Gray8, 0) => (w, h),
            (Self::Nv12, 0) => (w, h),
            (Self::Nv12, 1) => (half_w * 2, half_h),
            (Self::Yuv420p | Self::Yuvj420p | Self::Yuv420p10, 0) => (w * bps, h),
            (Self::Yuv420p | Self::Yuvj420p | Self::Yuv420p10, 1 | 2) => (half_w * bps, half_h),
            (Self::Yuv422p, 0) => (w, h),
            (Self::Yuv422p, 1 | 2) => (half_w, h),
            (Self::Yuv444p, 0..=2) => (w, h),
            _ => (0, 0),
        }
    }

    /**
        Total tightly-packed size in bytes of a picture of the given dimensions.
    */
    pub const fn frame_size(self, width: u32, height: u32) -> usize {
        let mut total = 0;
        let mut plane = 0;
        while plane < self.plane_count() {
            let (row, rows) = self.plane_size(plane, width, height);
            total += row * rows;
            plane += 1;
        }
        total
    }
}
