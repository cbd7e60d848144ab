/*!
    Media source implementation.
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use ffmpeg_next::{ffi, format::context::Input as InputContext};
use tracing::{debug, trace};

use vidframe_types::{Error, PacketSource, Result, StreamDescriptor};

use crate::codec_config::CodecConfig;
use crate::convert::{error_from_ffmpeg, rational_from_ffmpeg};
use crate::packet::SourcePacket;
use crate::probe::{describe_streams, open_input};
use crate::select::select_video_stream;

/**
    An open container that produces compressed packets.

    Created by [`open`] or [`MediaSource::open`]. Owns the demux context and
    its stream table; both are released when the source is dropped.
*/
pub struct MediaSource {
    input: InputContext,
    streams: Vec<StreamDescriptor>,
    path: PathBuf,
}

impl MediaSource {
    /**
        Open a container and parse its stream metadata.

        # Example

        ```ignore
        let source = MediaSource::open("video.mp4")?;
        let index = source.select_video_stream(None)?;
        println!("decoding stream {index} of {}", source.streams().len());
        ```
    */
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input = open_input(path)?;
        let streams = describe_streams(&input)?;

        debug!(
            path = %path.display(),
            format = input.format().name(),
            streams = streams.len(),
            "opened container"
        );

        Ok(Self {
            input,
            streams,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /**
        Stream table, ordered by stream index.
    */
    pub fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    pub fn stream(&self, index: usize) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.index == index)
    }

    /**
        Container duration, if the demuxer knows it.
    */
    pub fn duration(&self) -> Option<Duration> {
        u64::try_from(self.input.duration())
            .ok()
            .filter(|d| *d > 0)
            .map(Duration::from_micros)
    }

    /**
        Whether FFmpeg has a decoder for the codec of stream `index`.
    */
    pub fn has_decoder(&self, index: usize) -> bool {
        self.input
            .stream(index)
            .is_some_and(|s| ffmpeg_next::decoder::find(s.parameters().id()).is_some())
    }

    /**
        Pick the video stream to decode. See [`select_video_stream`].
    */
    pub fn select_video_stream(&self, preferred: Option<usize>) -> Result<usize> {
        let index = select_video_stream(&self.streams, preferred, |s| self.has_decoder(s.index))?;
        debug!(index, preferred = ?preferred, "selected video stream");
        Ok(index)
    }

    /**
        Copy the codec parameters of stream `index`, for opening a codec
        session on it.
    */
    pub fn codec_config(&self, index: usize) -> Result<CodecConfig> {
        let descriptor = self
            .stream(index)
            .ok_or_else(|| Error::stream_not_found(format!("stream {index} does not exist")))?;
        let stream = self
            .input
            .stream(index)
            .ok_or_else(|| Error::stream_not_found(format!("stream {index} does not exist")))?;

        Ok(CodecConfig::new(stream.parameters().clone(), descriptor.clone()))
    }

    /**
        Ask the demuxer to drop every non-key packet of stream `index`.

        Demuxers that can't tell key packets apart ignore the request, so a
        decoder fed from this source should skip non-key frames as well.
    */
    pub fn discard_non_keyframes(&mut self, index: usize) -> Result<()> {
        let mut stream = self
            .input
            .stream_mut(index)
            .ok_or_else(|| Error::stream_not_found(format!("stream {index} does not exist")))?;

        // SAFETY: `discard` is a plain field of an AVStream owned by the open
        // input context, which outlives this borrow.
        unsafe {
            (*stream.as_mut_ptr()).discard = ffi::AVDiscard::AVDISCARD_NONKEY;
        }
        debug!(index, "discarding non-key packets");
        Ok(())
    }

    /**
        Read the next packet from the container.

        Returns `Ok(Some(packet))` for each packet of any stream, in file order,
        and `Ok(None)` once the container is exhausted. A failed read is
        returned as [`Error::Demux`]; there is no retry.
    */
    pub fn read_packet(&mut self) -> Result<Option<SourcePacket>> {
        let mut packet = ffmpeg_next::Packet::empty();

        match packet.read(&mut self.input) {
            Ok(()) => {
                let index = packet.stream();
                let time_base = self
                    .input
                    .stream(index)
                    .map(|s| rational_from_ffmpeg(s.time_base()))
                    .ok_or_else(|| Error::demux(format!("packet for unknown stream {index}")))?;

                trace!(
                    stream = index,
                    pts = ?packet.pts(),
                    dts = ?packet.dts(),
                    size = packet.size(),
                    key = packet.is_key(),
                    "read packet"
                );
                Ok(Some(SourcePacket::new(packet, time_base)))
            }
            Err(ffmpeg_next::Error::Eof) => {
                debug!(path = %self.path.display(), "end of container");
                Ok(None)
            }
            Err(e) => Err(error_from_ffmpeg(e, Error::Demux)),
        }
    }
}

impl PacketSource for MediaSource {
    type Packet = SourcePacket;

    fn streams(&self) -> &[StreamDescriptor] {
        MediaSource::streams(self)
    }

    fn read_packet(&mut self) -> Result<Option<SourcePacket>> {
        MediaSource::read_packet(self)
    }
}

/**
    Iterator adapter yielding packets until the container is exhausted.
*/
impl Iterator for MediaSource {
    type Item = Result<SourcePacket>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_packet().transpose()
    }
}

impl Drop for MediaSource {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), "closing container");
    }
}

impl std::fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSource")
            .field("path", &self.path)
            .field("streams", &self.streams)
            .finish_non_exhaustive()
    }
}

/**
    Open a container.

    Equivalent to [`MediaSource::open`].
*/
pub fn open<P: AsRef<Path>>(path: P) -> Result<MediaSource> {
    MediaSource::open(path)
}
