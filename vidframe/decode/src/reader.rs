/*!
    Pull-based frame reader.

    Drives a [`PacketSource`] and a [`FrameDecoder`] through the send/receive
    protocol, one frame per pull:

    - `Reading`: packets are pulled until one belongs to the selected stream,
      which is fed to the decoder before asking for a frame. Packets of other
      streams are dropped. When the decoder needs more input the next packet
      is pulled; when the source runs out the reader starts draining.
    - `Draining`: end of input is signalled once and the decoder is asked for
      the frames it still buffers (reordered B-frames and the like).
    - `Done`: every frame has been returned; all further pulls return `None`.

    The state only ever moves forward.
*/

use tracing::{debug, trace, warn};

use vidframe_types::{
    DecodedFrame, EncodedPacket, Error, FrameDecoder, PacketSource, Receive, Result,
    StreamDescriptor,
};

/**
    Position of a [`FrameReader`] in its lifecycle.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    /// The source still has packets.
    Reading,
    /// The source is exhausted and the decoder is being flushed.
    Draining,
    /// The decoder is flushed; no more frames will be produced.
    Done,
}

/**
    Yields the decoded frames of one stream.

    The reader owns a single frame slot that is reused for every frame:
    [`next_frame`](Self::next_frame) returns a borrow of it, so a frame must be
    consumed or copied before the next one is requested.
*/
pub struct FrameReader<S, D>
where
    S: PacketSource,
    D: FrameDecoder<Packet = S::Packet>,
{
    // Fields drop in declaration order: the codec session goes before the
    // container it was opened from.
    decoder: D,
    source: S,
    frame: D::Frame,
    stream_index: usize,
    state: ReaderState,
    /// The last receive produced a frame, so the decoder may hold more.
    pending_output: bool,
    eof_signalled: bool,
}

impl<S, D> FrameReader<S, D>
where
    S: PacketSource,
    D: FrameDecoder<Packet = S::Packet>,
{
    /**
        Create a reader decoding stream `stream_index` of `source` with
        `decoder`.
    */
    pub fn new(source: S, decoder: D, stream_index: usize) -> Result<Self> {
        if !source.streams().iter().any(|s| s.index == stream_index) {
            return Err(Error::invalid_argument(format!(
                "stream {stream_index} is not in the source"
            )));
        }

        Ok(Self {
            decoder,
            source,
            frame: D::Frame::empty(),
            stream_index,
            state: ReaderState::Reading,
            pending_output: false,
            eof_signalled: false,
        })
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn stream_index(&self) -> usize {
        self.stream_index
    }

    /**
        Descriptor of the stream being decoded.
    */
    pub fn stream(&self) -> Option<&StreamDescriptor> {
        self.source
            .streams()
            .iter()
            .find(|s| s.index == self.stream_index)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /**
        Produce the next decoded frame.

        Returns `Ok(None)` once every frame, including those only released by
        draining the decoder, has been returned, and keeps returning it.
        Errors from the source or decoder are returned as-is and leave the
        reader in its current state, so the caller may keep pulling or give up.
    */
    pub fn next_frame(&mut self) -> Result<Option<&D::Frame>> {
        let produced = self.advance()?;
        Ok(produced.then_some(&self.frame))
    }

    fn advance(&mut self) -> Result<bool> {
        loop {
            match self.state {
                ReaderState::Done => return Ok(false),
                ReaderState::Draining => return self.drain(),
                ReaderState::Reading => {
                    if self.pending_output {
                        self.pending_output = false;
                        if self.receive()? {
                            return Ok(true);
                        }
                        continue;
                    }

                    let Some(packet) = self.source.read_packet()? else {
                        debug!(stream = self.stream_index, "source exhausted, draining decoder");
                        self.state = ReaderState::Draining;
                        continue;
                    };

                    if packet.stream_index() != self.stream_index {
                        trace!(stream = packet.stream_index(), "skipping packet");
                        continue;
                    }

                    self.decoder.feed(Some(packet))?;
                    if self.receive()? {
                        return Ok(true);
                    }
                }
            }
        }
    }

    fn receive(&mut self) -> Result<bool> {
        match self.decoder.receive(&mut self.frame)? {
            Receive::Frame => {
                trace!(pts = ?self.frame.pts(), key = self.frame.is_keyframe(), "decoded frame");
                self.pending_output = true;
                Ok(true)
            }
            Receive::NeedMoreInput => Ok(false),
            Receive::Exhausted => {
                warn!(stream = self.stream_index, "decoder exhausted before end of input");
                self.state = ReaderState::Done;
                Ok(false)
            }
        }
    }

    fn drain(&mut self) -> Result<bool> {
        if !self.eof_signalled {
            self.decoder.feed(None)?;
            self.eof_signalled = true;
        }

        match self.decoder.receive(&mut self.frame)? {
            Receive::Frame => {
                trace!(pts = ?self.frame.pts(), "drained frame");
                Ok(true)
            }
            Receive::Exhausted => {
                debug!(stream = self.stream_index, "decoder drained");
                self.state = ReaderState::Done;
                Ok(false)
            }
            Receive::NeedMoreInput => {
                warn!(stream = self.stream_index, "decoder wants input after end of stream");
                self.state = ReaderState::Done;
                Ok(false)
            }
        }
    }
}

impl<S, D> std::fmt::Debug for FrameReader<S, D>
where
    S: PacketSource,
    D: FrameDecoder<Packet = S::Packet>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReader")
            .field("stream_index", &self.stream_index)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use vidframe_types::{CodecId, MediaType, Packet, Pts, Rational, VideoFrame};

    use super::*;

    const TIME_BASE: Rational = Rational::new(1, 25);
    const AUDIO: usize = 0;
    const VIDEO: usize = 1;
    const CORRUPT: &[u8] = b"corrupt";

    struct ScriptedSource {
        streams: Vec<StreamDescriptor>,
        packets: VecDeque<Result<Packet>>,
        reads: usize,
        released: Rc<Cell<bool>>,
    }

    impl ScriptedSource {
        fn new(packets: Vec<Packet>) -> Self {
            Self::with_results(packets.into_iter().map(Ok).collect())
        }

        fn with_results(packets: Vec<Result<Packet>>) -> Self {
            Self {
                streams: vec![
                    StreamDescriptor::new(AUDIO, MediaType::Audio, CodecId::Aac, "aac", TIME_BASE),
                    StreamDescriptor::new(VIDEO, MediaType::Video, CodecId::H264, "h264", TIME_BASE),
                ],
                packets: packets.into(),
                reads: 0,
                released: Rc::default(),
            }
        }
    }

    impl PacketSource for ScriptedSource {
        type Packet = Packet;

        fn streams(&self) -> &[StreamDescriptor] {
            &self.streams
        }

        fn read_packet(&mut self) -> Result<Option<Packet>> {
            self.reads += 1;
            self.packets.pop_front().transpose()
        }
    }

    impl Drop for ScriptedSource {
        fn drop(&mut self) {
            self.released.set(true);
        }
    }

    /**
        Holds back `delay` frames and releases them in pts order, the way a
        decoder absorbs B-frame reordering. A packet expands to one frame per
        payload byte. Like FFmpeg, it refuses input while output is pending.
    */
    struct ReorderingDecoder {
        delay: usize,
        buffered: Vec<(i64, bool)>,
        eof: bool,
        exhausted: bool,
        stall_after_eof: bool,
        fed: Vec<i64>,
        eof_signals: usize,
        receives_after_exhausted: usize,
        released: Rc<Cell<bool>>,
    }

    impl ReorderingDecoder {
        fn new(delay: usize) -> Self {
            Self {
                delay,
                buffered: Vec::new(),
                eof: false,
                exhausted: false,
                stall_after_eof: false,
                fed: Vec::new(),
                eof_signals: 0,
                receives_after_exhausted: 0,
                released: Rc::default(),
            }
        }

        fn output_pending(&self) -> bool {
            self.buffered.len() > self.delay
        }
    }

    impl FrameDecoder for ReorderingDecoder {
        type Packet = Packet;
        type Frame = VideoFrame;

        fn feed(&mut self, packet: Option<Packet>) -> Result<()> {
            let Some(packet) = packet else {
                self.eof_signals += 1;
                self.eof = true;
                return Ok(());
            };

            if self.eof {
                return Err(Error::decode("packet after end of input"));
            }
            if self.output_pending() {
                return Err(Error::decode("fed while output pending"));
            }
            if packet.data == CORRUPT {
                return Err(Error::decode("corrupt packet"));
            }

            let pts = packet.pts.map_or(0, |p| p.0);
            self.fed.push(pts);
            for offset in 0..packet.data.len().max(1) {
                let key = packet.is_keyframe && offset == 0;
                self.buffered.push((pts + offset as i64, key));
            }
            Ok(())
        }

        fn receive(&mut self, frame: &mut VideoFrame) -> Result<Receive> {
            if self.exhausted {
                self.receives_after_exhausted += 1;
                return Ok(Receive::Exhausted);
            }
            if self.buffered.is_empty() && self.eof {
                if self.stall_after_eof {
                    return Ok(Receive::NeedMoreInput);
                }
                self.exhausted = true;
                return Ok(Receive::Exhausted);
            }
            if !self.output_pending() && !self.eof {
                return Ok(Receive::NeedMoreInput);
            }

            let next = self
                .buffered
                .iter()
                .enumerate()
                .min_by_key(|(_, (pts, _))| *pts)
                .map(|(i, _)| i)
                .unwrap();
            let (pts, key) = self.buffered.remove(next);

            frame.data = vec![pts as u8];
            frame.pts = Some(Pts(pts));
            frame.time_base = TIME_BASE;
            frame.is_keyframe = key;
            Ok(Receive::Frame)
        }
    }

    impl Drop for ReorderingDecoder {
        fn drop(&mut self) {
            self.released.set(true);
        }
    }

    fn video(pts: i64) -> Packet {
        Packet::new(vec![0], VIDEO, TIME_BASE)
            .with_pts(pts)
            .with_keyframe(pts == 0)
    }

    fn audio(pts: i64) -> Packet {
        Packet::new(vec![0], AUDIO, TIME_BASE).with_pts(pts)
    }

    fn corrupt(pts: i64) -> Packet {
        Packet::new(CORRUPT.to_vec(), VIDEO, TIME_BASE).with_pts(pts)
    }

    fn reader(
        packets: Vec<Packet>,
        delay: usize,
    ) -> FrameReader<ScriptedSource, ReorderingDecoder> {
        FrameReader::new(ScriptedSource::new(packets), ReorderingDecoder::new(delay), VIDEO)
            .unwrap()
    }

    fn collect_pts<S, D>(reader: &mut FrameReader<S, D>) -> Vec<i64>
    where
        S: PacketSource,
        D: FrameDecoder<Packet = S::Packet>,
    {
        let mut out = Vec::new();
        while let Some(frame) = reader.next_frame().unwrap() {
            out.push(frame.pts().unwrap().0);
        }
        out
    }

    #[test]
    fn drains_frames_held_back_by_reordering() {
        // I0 P3 B1 B2 P6 B4 B5 in decode order
        let packets = [0, 3, 1, 2, 6, 4, 5].map(video).to_vec();
        let mut reader = reader(packets, 2);

        let mut pts = Vec::new();
        let mut drained = 0;
        while let Some(frame) = reader.next_frame().unwrap() {
            pts.push(frame.pts().unwrap().0);
            if reader.state() == ReaderState::Draining {
                drained += 1;
            }
        }

        assert_eq!(pts, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(drained, 2);
        assert_eq!(reader.state(), ReaderState::Done);
        assert_eq!(reader.decoder().eof_signals, 1);
    }

    #[test]
    fn first_frame_keeps_key_flag() {
        let mut reader = reader([0, 1, 2].map(video).to_vec(), 0);
        let frame = reader.next_frame().unwrap().unwrap();
        assert!(frame.is_keyframe());
        assert_eq!(frame.timestamp(), Some(std::time::Duration::ZERO));
        let frame = reader.next_frame().unwrap().unwrap();
        assert!(!frame.is_keyframe());
    }

    #[test]
    fn packets_of_other_streams_are_discarded() {
        let packets = vec![audio(0), video(0), audio(1), audio(2), video(1), audio(3)];
        let mut reader = reader(packets, 0);

        assert_eq!(collect_pts(&mut reader), vec![0, 1]);
        assert_eq!(reader.decoder().fed, vec![0, 1]);
        assert_eq!(reader.source().reads, 7);
    }

    #[test]
    fn does_not_read_ahead_of_the_returned_frame() {
        let mut reader = reader([0, 1, 2].map(video).to_vec(), 0);

        reader.next_frame().unwrap().unwrap();
        assert_eq!(reader.source().reads, 1);
        assert_eq!(reader.state(), ReaderState::Reading);
    }

    #[test]
    fn done_is_terminal() {
        let mut reader = reader([0, 1].map(video).to_vec(), 1);
        assert_eq!(collect_pts(&mut reader), vec![0, 1]);

        let reads = reader.source().reads;
        for _ in 0..3 {
            assert!(reader.next_frame().unwrap().is_none());
            assert_eq!(reader.state(), ReaderState::Done);
        }
        assert_eq!(reader.source().reads, reads);
        assert_eq!(reader.decoder().eof_signals, 1);
        assert_eq!(reader.decoder().receives_after_exhausted, 0);
    }

    #[test]
    fn empty_source_goes_straight_to_done() {
        let mut reader = reader(Vec::new(), 2);
        assert!(reader.next_frame().unwrap().is_none());
        assert_eq!(reader.state(), ReaderState::Done);
    }

    #[test]
    fn several_frames_from_one_packet_are_all_received() {
        let double = |pts: i64| Packet::new(vec![0, 0], VIDEO, TIME_BASE).with_pts(pts);
        let mut reader = reader(vec![double(0), double(10)], 0);

        assert_eq!(collect_pts(&mut reader), vec![0, 1, 10, 11]);
    }

    #[test]
    fn corrupt_packet_surfaces_decode_error() {
        let packets = vec![video(0), corrupt(1), video(2), video(3)];
        let source = ScriptedSource::new(packets);
        let decoder = ReorderingDecoder::new(0);
        let source_released = Rc::clone(&source.released);
        let decoder_released = Rc::clone(&decoder.released);
        let mut reader = FrameReader::new(source, decoder, VIDEO).unwrap();

        assert_eq!(reader.next_frame().unwrap().unwrap().pts(), Some(Pts(0)));
        let err = reader.next_frame().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert_eq!(reader.state(), ReaderState::Reading);

        assert_eq!(collect_pts(&mut reader), vec![2, 3]);

        drop(reader);
        assert!(source_released.get());
        assert!(decoder_released.get());
    }

    #[test]
    fn read_error_is_surfaced_and_reading_continues() {
        let source = ScriptedSource::with_results(vec![
            Ok(video(0)),
            Err(Error::demux("I/O error")),
            Ok(video(1)),
        ]);
        let mut reader = FrameReader::new(source, ReorderingDecoder::new(0), VIDEO).unwrap();

        assert!(reader.next_frame().unwrap().is_some());
        assert!(matches!(reader.next_frame(), Err(Error::Demux(_))));
        assert_eq!(collect_pts(&mut reader), vec![1]);
    }

    #[test]
    fn decoder_stalling_after_end_of_input_ends_the_sequence() {
        let mut decoder = ReorderingDecoder::new(1);
        decoder.stall_after_eof = true;
        let mut reader =
            FrameReader::new(ScriptedSource::new([0, 1].map(video).to_vec()), decoder, VIDEO)
                .unwrap();

        assert_eq!(collect_pts(&mut reader), vec![0, 1]);
        assert_eq!(reader.state(), ReaderState::Done);
    }

    #[test]
    fn unknown_stream_is_rejected() {
        let err = FrameReader::new(ScriptedSource::new(Vec::new()), ReorderingDecoder::new(0), 5)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn stream_descriptor_is_exposed() {
        let reader = reader(Vec::new(), 0);
        let stream = reader.stream().unwrap();
        assert_eq!(stream.index, VIDEO);
        assert!(stream.is_video());
    }
}
