/*!
    Codec session: one opened decoder bound to one stream.
*/

use ffmpeg_next::{
    codec::{self, decoder::Video as VideoDecoderFFmpeg},
    error::EAGAIN,
    ffi,
};
use tracing::{debug, trace};

use vidframe_source::{CodecConfig, SourcePacket, error_from_ffmpeg};
use vidframe_types::{Error, FrameDecoder, Rational, Receive, Result, StreamDescriptor};

use crate::config::SessionOptions;
use crate::frame::Frame;

/**
    An opened video decoder for one stream.

    Implements the two-phase protocol: [`feed`](FrameDecoder::feed) submits
    compressed packets (or `None` for end of input) and
    [`receive`](FrameDecoder::receive) pulls decoded frames. Decoder state is
    released when the session is dropped.
*/
pub struct CodecSession {
    decoder: VideoDecoderFFmpeg,
    stream: StreamDescriptor,
    eof_sent: bool,
}

impl CodecSession {
    /**
        Open a decoder for the stream `config` was copied from.

        Fails with [`Error::DecoderNotFound`] if FFmpeg has no decoder for the
        codec and [`Error::CodecOpen`] if the decoder rejects the parameters.
    */
    pub fn open(config: CodecConfig, options: SessionOptions) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| error_from_ffmpeg(e, Error::CodecOpen))?;

        let stream = config.stream().clone();
        let codec = ffmpeg_next::decoder::find(config.codec_id())
            .ok_or_else(|| Error::DecoderNotFound(stream.codec_name.clone()))?;

        let mut context = codec::context::Context::from_parameters(config.into_parameters())
            .map_err(|e| error_from_ffmpeg(e, Error::CodecOpen))?;

        // SAFETY: plain fields of the codec context we own, set before it is
        // opened.
        unsafe {
            let ctx = context.as_mut_ptr();
            (*ctx).pkt_timebase =
                ffmpeg_next::Rational::new(stream.time_base.num, stream.time_base.den).into();
            if options.skip_non_keyframes {
                (*ctx).skip_frame = ffi::AVDiscard::AVDISCARD_NONKEY;
            }
        }

        // Decoded frames are always reference-counted; receiving into the slot
        // unrefs the previous picture.
        let decoder = context
            .decoder()
            .open_as(codec)
            .and_then(|opened| opened.video())
            .map_err(|e| error_from_ffmpeg(e, Error::CodecOpen))?;

        debug!(
            stream = stream.index,
            codec = %stream.codec_name,
            width = decoder.width(),
            height = decoder.height(),
            skip_non_keyframes = options.skip_non_keyframes,
            "opened codec session"
        );

        Ok(Self {
            decoder,
            stream,
            eof_sent: false,
        })
    }

    /**
        Descriptor of the stream this session decodes.
    */
    pub fn stream(&self) -> &StreamDescriptor {
        &self.stream
    }

    pub fn stream_index(&self) -> usize {
        self.stream.index
    }

    /**
        Time base of the timestamps on decoded frames.
    */
    pub fn time_base(&self) -> Rational {
        self.stream.time_base
    }

    /**
        Whether end of input has been signalled.
    */
    pub fn is_flushing(&self) -> bool {
        self.eof_sent
    }
}

impl FrameDecoder for CodecSession {
    type Packet = SourcePacket;
    type Frame = Frame;

    fn feed(&mut self, packet: Option<SourcePacket>) -> Result<()> {
        let Some(packet) = packet else {
            if self.eof_sent {
                return Ok(());
            }
            return match self.decoder.send_eof() {
                Ok(()) | Err(ffmpeg_next::Error::Eof) => {
                    debug!(stream = self.stream.index, "signalled end of input");
                    self.eof_sent = true;
                    Ok(())
                }
                Err(e) => Err(error_from_ffmpeg(e, Error::Decode)),
            };
        };

        if self.eof_sent {
            return Err(Error::invalid_argument("packet fed after end of input"));
        }

        // The packet is dropped on return, releasing its buffer whether or not
        // the decoder accepted it.
        self.decoder
            .send_packet(packet.as_ffmpeg())
            .map_err(|e| error_from_ffmpeg(e, Error::Decode))
    }

    fn receive(&mut self, frame: &mut Frame) -> Result<Receive> {
        match self.decoder.receive_frame(frame.as_ffmpeg_mut()) {
            Ok(()) => Ok(Receive::Frame),
            Err(ffmpeg_next::Error::Other { errno }) if errno == EAGAIN => {
                Ok(Receive::NeedMoreInput)
            }
            Err(ffmpeg_next::Error::Eof) => Ok(Receive::Exhausted),
            Err(e) => Err(error_from_ffmpeg(e, Error::Decode)),
        }
    }
}

impl Drop for CodecSession {
    fn drop(&mut self) {
        trace!(stream = self.stream.index, "closing codec session");
    }
}

impl std::fmt::Debug for CodecSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecSession")
            .field("stream", &self.stream.index)
            .field("codec", &self.stream.codec_name)
            .field("eof_sent", &self.eof_sent)
            .finish_non_exhaustive()
    }
}
