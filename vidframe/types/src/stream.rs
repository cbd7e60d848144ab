/*!
    Stream description types.
*/

use std::time::Duration;

use crate::{CodecId, Rational};

/**
    Kind of media carried by a stream.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaType {
    Video,
    Audio,
    Subtitle,
    Data,
    Other,
}

/**
    Read-only metadata for one stream of an open container.

    The index is the stream's position in the container's stream table and
    stays stable for the container's lifetime.
*/
#[derive(Clone, Debug)]
pub struct StreamDescriptor {
    /// Position in the container's stream table.
    pub index: usize,
    /// Kind of media carried.
    pub media_type: MediaType,
    /// Codec identifier.
    pub codec_id: CodecId,
    /// Codec name as reported by the demuxer (e.g. "h264", "pcm_s16le").
    pub codec_name: String,
    /// Time base for this stream's timestamps.
    pub time_base: Rational,
    /// Average frame rate (video only, may be unavailable).
    pub frame_rate: Option<Rational>,
    /// Stream duration (may be unavailable).
    pub duration: Option<Duration>,
    /// Coded width in pixels (video only).
    pub width: Option<u32>,
    /// Coded height in pixels (video only).
    pub height: Option<u32>,
}

impl StreamDescriptor {
    /**
        Create a descriptor with only the required fields set.
    */
    pub fn new(
        index: usize,
        media_type: MediaType,
        codec_id: CodecId,
        codec_name: impl Into<String>,
        time_base: Rational,
    ) -> Self {
        Self {
            index,
            media_type,
            codec_id,
            codec_name: codec_name.into(),
            time_base,
            frame_rate: None,
            duration: None,
            width: None,
            height: None,
        }
    }

    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }

    /**
        Returns the frame rate as fps, if available.
    */
    pub fn fps(&self) -> Option<f64> {
        self.frame_rate.filter(|r| r.is_valid()).map(|r| r.to_f64())
    }
}
