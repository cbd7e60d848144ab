/*!
    The narrow interface between the frame reader and a demux/decode engine.

    A backend provides a [`PacketSource`] (the open container) and a
    [`FrameDecoder`] (a codec session bound to one of its streams). The frame
    reader drives the two through the send/receive protocol and never needs to
    know which media library sits behind them.
*/

use crate::{Pts, Result, StreamDescriptor};

/**
    A demultiplexed, still compressed packet.
*/
pub trait EncodedPacket {
    /// Index of the stream this packet belongs to.
    fn stream_index(&self) -> usize;
    fn pts(&self) -> Option<Pts>;
    fn dts(&self) -> Option<Pts>;
    fn is_keyframe(&self) -> bool;
}

/**
    A decoded picture held in the reader's single frame slot.
*/
pub trait DecodedFrame {
    /**
        Allocate an empty slot for the decoder to write into.
    */
    fn empty() -> Self;
    fn pts(&self) -> Option<Pts>;
    fn dts(&self) -> Option<Pts>;
    fn is_keyframe(&self) -> bool;
}

/**
    An open container that yields packets from all of its streams in file
    order.
*/
pub trait PacketSource {
    type Packet: EncodedPacket;

    /// Stream table, ordered by stream index.
    fn streams(&self) -> &[StreamDescriptor];

    /**
        Read the next packet of any stream.

        Returns `Ok(None)` once the container is exhausted. Performs a single
        read, with no internal retry.
    */
    fn read_packet(&mut self) -> Result<Option<Self::Packet>>;
}

/**
    Outcome of asking a decoder for a frame.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Receive {
    /// A frame was written into the slot.
    Frame,
    /// The decoder needs another packet before it can produce a frame.
    NeedMoreInput,
    /// End of input was signalled and every buffered frame has been returned.
    Exhausted,
}

/**
    A codec session bound to one stream.
*/
pub trait FrameDecoder {
    type Packet;
    type Frame: DecodedFrame;

    /**
        Submit a packet, or `None` to signal end of input.

        The packet is consumed. Signalling end of input more than once has no
        further effect.
    */
    fn feed(&mut self, packet: Option<Self::Packet>) -> Result<()>;

    /**
        Try to produce one frame from the data fed so far, writing it into
        `frame`. The previous contents of `frame` are released.
    */
    fn receive(&mut self, frame: &mut Self::Frame) -> Result<Receive>;
}
