/*!
    Conversion utilities between ffmpeg-next types and vidframe-types.
*/

use ffmpeg_next::{error::ENOMEM, media::Type};

use vidframe_types::{CodecId, Error, MediaType, PixelFormat, Pts, Rational};

pub(crate) fn rational_from_ffmpeg(r: ffmpeg_next::Rational) -> Rational {
    Rational::new(r.numerator(), r.denominator())
}

pub(crate) fn media_type_from_ffmpeg(medium: Type) -> MediaType {
    match medium {
        Type::Video => MediaType::Video,
        Type::Audio => MediaType::Audio,
        Type::Subtitle => MediaType::Subtitle,
        Type::Data => MediaType::Data,
        _ => MediaType::Other,
    }
}

pub(crate) fn codec_id_from_ffmpeg(id: ffmpeg_next::codec::Id) -> CodecId {
    use ffmpeg_next::codec::Id;

    match id {
        // Video
        Id::H264 => CodecId::H264,
        Id::HEVC => CodecId::H265,
        Id::VP8 => CodecId::Vp8,
        Id::VP9 => CodecId::Vp9,
        Id::AV1 => CodecId::Av1,
        Id::MPEG4 => CodecId::Mpeg4,
        Id::MPEG2VIDEO => CodecId::Mpeg2Video,
        Id::MJPEG => CodecId::Mjpeg,
        // Audio
        Id::AAC => CodecId::Aac,
        Id::OPUS => CodecId::Opus,
        Id::MP3 => CodecId::Mp3,
        Id::VORBIS => CodecId::Vorbis,
        Id::FLAC => CodecId::Flac,
        Id::AC3 => CodecId::Ac3,
        Id::PCM_S16LE => CodecId::PcmS16Le,
        Id::PCM_S16BE => CodecId::PcmS16Be,
        Id::PCM_F32LE => CodecId::PcmF32Le,
        _ => CodecId::Unknown,
    }
}

/**
    Convert an FFmpeg pixel format, if it is one the pipeline can copy out.
*/
pub fn pixel_format_from_ffmpeg(format: ffmpeg_next::format::Pixel) -> Option<PixelFormat> {
    use ffmpeg_next::format::Pixel;

    match format {
        Pixel::YUV420P => Some(PixelFormat::Yuv420p),
        Pixel::YUVJ420P => Some(PixelFormat::Yuvj420p),
        Pixel::YUV422P => Some(PixelFormat::Yuv422p),
        Pixel::YUV444P => Some(PixelFormat::Yuv444p),
        Pixel::YUV420P10LE => Some(PixelFormat::Yuv420p10),
        Pixel::NV12 => Some(PixelFormat::Nv12),
        Pixel::GRAY8 => Some(PixelFormat::Gray8),
        Pixel::RGB24 => Some(PixelFormat::Rgb24),
        Pixel::BGR24 => Some(PixelFormat::Bgr24),
        Pixel::RGBA => Some(PixelFormat::Rgba),
        Pixel::BGRA => Some(PixelFormat::Bgra),
        _ => None,
    }
}

pub(crate) fn pts_from_ffmpeg(ts: Option<i64>) -> Option<Pts> {
    ts.map(Pts)
}

/**
    Map an FFmpeg error onto the pipeline's error kinds.

    Out-of-memory always becomes [`Error::Allocation`] and a missing decoder
    [`Error::DecoderNotFound`]; everything else is wrapped by `kind`, which
    names the operation that failed.
*/
pub fn error_from_ffmpeg(err: ffmpeg_next::Error, kind: fn(String) -> Error) -> Error {
    match err {
        ffmpeg_next::Error::Other { errno } if errno == ENOMEM => Error::Allocation(err.to_string()),
        ffmpeg_next::Error::DecoderNotFound => Error::DecoderNotFound(err.to_string()),
        _ => kind(err.to_string()),
    }
}
