/*!
    Codec identifiers.
*/

use crate::MediaType;

/**
    Codec identifier for a stream.

    Only codecs commonly met in containers are named; anything else maps to
    [`CodecId::Unknown`] and is still identified by the stream's codec name.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecId {
    // Video
    H264,
    H265,
    Vp8,
    Vp9,
    Av1,
    Mpeg4,
    Mpeg2Video,
    Mjpeg,
    // Audio
    Aac,
    Opus,
    Mp3,
    Vorbis,
    Flac,
    Ac3,
    PcmS16Le,
    PcmS16Be,
    PcmF32Le,
    Unknown,
}

impl CodecId {
    /**
        Media type this codec normally carries, if it is a known codec.
    */
    pub const fn media_type(self) -> Option<MediaType> {
        match self {
            Self::H264
            | Self::H265
            | Self::Vp8
            | Self::Vp9
            | Self::Av1
            | Self::Mpeg4
            | Self::Mpeg2Video
            | Self::Mjpeg => Some(MediaType::Video),
            Self::Aac
            | Self::Opus
            | Self::Mp3
            | Self::Vorbis
            | Self::Flac
            | Self::Ac3
            | Self::PcmS16Le
            | Self::PcmS16Be
            | Self::PcmF32Le => Some(MediaType::Audio),
            Self::Unknown => None,
        }
    }
}
