/*!
    Decoded frame held in the reader's frame slot.
*/

use ffmpeg_next::{ffi, util::frame::video::Video as VideoFrameFFmpeg};

use vidframe_source::pixel_format_from_ffmpeg;
use vidframe_types::{DecodedFrame, Error, PixelFormat, Pts, Rational, Result, VideoFrame};

/**
    A decoded picture, still in the decoder's reference-counted buffers.

    The frame reader owns exactly one of these and reuses it for every frame,
    so a borrowed `Frame` is only valid until the next pull. Use
    [`Frame::to_video_frame`] to keep a copy.
*/
pub struct Frame {
    inner: VideoFrameFFmpeg,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /**
        Pixel format, if it is one the pipeline knows how to copy.
    */
    pub fn format(&self) -> Option<PixelFormat> {
        pixel_format_from_ffmpeg(self.inner.format())
    }

    pub fn planes(&self) -> usize {
        self.inner.planes()
    }

    /**
        Raw bytes of one plane, including row padding.
    */
    pub fn data(&self, plane: usize) -> Option<&[u8]> {
        (plane < self.inner.planes()).then(|| self.inner.data(plane))
    }

    /**
        Row stride of one plane in bytes.
    */
    pub fn stride(&self, plane: usize) -> Option<usize> {
        (plane < self.inner.planes()).then(|| self.inner.stride(plane))
    }

    /**
        The underlying FFmpeg frame, e.g. for handing to an encoder.
    */
    pub fn as_ffmpeg(&self) -> &VideoFrameFFmpeg {
        &self.inner
    }

    pub(crate) fn as_ffmpeg_mut(&mut self) -> &mut VideoFrameFFmpeg {
        &mut self.inner
    }

    /**
        Copy the picture into an owned, tightly packed [`VideoFrame`].
    */
    pub fn to_video_frame(&self, time_base: Rational) -> Result<VideoFrame> {
        let width = self.width();
        let height = self.height();
        if width == 0 || height == 0 {
            return Err(Error::decode("frame has zero dimensions"));
        }

        let format = self.format().ok_or_else(|| {
            Error::decode(format!("unsupported pixel format {:?}", self.inner.format()))
        })?;

        let mut data = Vec::with_capacity(format.frame_size(width, height));
        for plane in 0..format.plane_count() {
            let (row_bytes, rows) = format.plane_size(plane, width, height);
            let stride = self.inner.stride(plane);
            let src = self.inner.data(plane);

            for row in 0..rows {
                let start = row * stride;
                let bytes = src.get(start..start + row_bytes).ok_or_else(|| {
                    Error::decode(format!("plane {plane} is shorter than {rows} rows"))
                })?;
                data.extend_from_slice(bytes);
            }
        }

        Ok(VideoFrame {
            data,
            width,
            height,
            format: Some(format),
            pts: self.pts(),
            dts: self.dts(),
            time_base,
            is_keyframe: self.is_keyframe(),
        })
    }
}

impl DecodedFrame for Frame {
    fn empty() -> Self {
        Self {
            inner: VideoFrameFFmpeg::empty(),
        }
    }

    fn pts(&self) -> Option<Pts> {
        self.inner.pts().map(Pts)
    }

    fn dts(&self) -> Option<Pts> {
        // SAFETY: reading a plain field of the AVFrame this wrapper owns.
        let dts = unsafe { (*self.inner.as_ptr()).pkt_dts };
        (dts != ffi::AV_NOPTS_VALUE).then_some(Pts(dts))
    }

    fn is_keyframe(&self) -> bool {
        self.inner.is_key()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("format", &self.inner.format())
            .field("pts", &self.inner.pts())
            .field("is_keyframe", &self.inner.is_key())
            .finish()
    }
}
