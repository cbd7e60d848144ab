/*!
    Video decoding for the vidframe pipeline.

    This crate turns the packets of a [`MediaSource`] into decoded frames. A
    [`CodecSession`] wraps one opened FFmpeg decoder, a [`FrameReader`] drives
    it one frame per pull (flushing the frames the codec holds back at end of
    input), and [`VideoDecoder`] wires both to a file.
*/

mod config;
mod frame;
mod pipeline;
mod reader;
mod session;

pub use self::config::{DecoderConfig, SessionOptions};
pub use self::frame::Frame;
pub use self::pipeline::{Frames, VideoDecoder, open};
pub use self::reader::{FrameReader, ReaderState};
pub use self::session::CodecSession;

pub use vidframe_source::{CodecConfig, MediaSource, SourcePacket, probe, select_video_stream};
pub use vidframe_types::{
    DecodedFrame, EncodedPacket, Error, FrameDecoder, MediaType, PacketSource, PixelFormat, Pts,
    Rational, Receive, Result, StreamDescriptor, VideoFrame,
};
