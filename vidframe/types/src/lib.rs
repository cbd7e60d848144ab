/*!
    Shared types for the vidframe decode pipeline.

    This crate defines the vocabulary of the pipeline: the types that cross crate
    boundaries and the narrow engine interface ([`PacketSource`], [`FrameDecoder`])
    the frame reader is written against. It has no dependency on FFmpeg, so the
    state machine can be driven by any demux/decode backend.
*/

mod codec;
mod engine;
mod error;
mod format;
mod frame;
mod packet;
mod stream;
mod time;

pub use self::codec::CodecId;
pub use self::engine::{DecodedFrame, EncodedPacket, FrameDecoder, PacketSource, Receive};
pub use self::error::{Error, Result};
pub use self::format::PixelFormat;
pub use self::frame::VideoFrame;
pub use self::packet::Packet;
pub use self::stream::{MediaType, StreamDescriptor};
pub use self::time::{MediaDuration, Pts, Rational};
