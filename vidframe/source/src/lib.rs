/*!
    Container opening and demuxing for the vidframe decode pipeline.

    This crate handles the input side of the pipeline. It opens a container,
    describes its streams, picks the video stream to decode and produces the
    compressed packets a codec session consumes.
*/

mod codec_config;
mod convert;
mod packet;
mod probe;
mod select;
mod source;

pub use self::codec_config::CodecConfig;
pub use self::convert::{error_from_ffmpeg, pixel_format_from_ffmpeg};
pub use self::packet::SourcePacket;
pub use self::probe::probe;
pub use self::select::select_video_stream;
pub use self::source::{MediaSource, open};
