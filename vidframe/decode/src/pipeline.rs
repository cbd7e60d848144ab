/*!
    One-call decode pipeline over a media file.
*/

use std::path::Path;

use tracing::{info, warn};

use vidframe_source::MediaSource;
use vidframe_types::{Error, Rational, Result, StreamDescriptor, VideoFrame};

use crate::config::{DecoderConfig, SessionOptions};
use crate::frame::Frame;
use crate::reader::{FrameReader, ReaderState};
use crate::session::CodecSession;

/**
    Decodes the frames of one video stream of a media file.

    Wires a [`MediaSource`], the selected stream's [`CodecSession`] and a
    [`FrameReader`] together. Everything is released when the decoder is
    dropped, the codec session before the container.

    # Example

    ```ignore
    let mut decoder = VideoDecoder::open("input.mkv", DecoderConfig::default())?;
    while let Some(frame) = decoder.next_frame()? {
        println!("{}x{} pts={:?}", frame.width(), frame.height(), frame.pts());
    }
    ```
*/
pub struct VideoDecoder {
    reader: FrameReader<MediaSource, CodecSession>,
}

impl VideoDecoder {
    /**
        Open `path`, select its video stream and open a decoder for it.
    */
    pub fn open<P: AsRef<Path>>(path: P, config: DecoderConfig) -> Result<Self> {
        let mut source = MediaSource::open(path)?;
        let index = source.select_video_stream(config.preferred_stream)?;
        if config.keyframes_only {
            source.discard_non_keyframes(index)?;
        }

        let codec_config = source.codec_config(index)?;
        let session = CodecSession::open(codec_config, SessionOptions::from(&config))?;

        info!(
            path = %source.path().display(),
            stream = index,
            codec = %session.stream().codec_name,
            keyframes_only = config.keyframes_only,
            "video decoder ready"
        );

        Ok(Self {
            reader: FrameReader::new(source, session, index)?,
        })
    }

    /**
        Decode the next frame.

        The returned frame is overwritten by the next call; copy it with
        [`Frame::to_video_frame`] to keep it. Returns `Ok(None)` at the end of
        the stream.
    */
    pub fn next_frame(&mut self) -> Result<Option<&Frame>> {
        self.reader.next_frame()
    }

    /**
        Iterate over owned copies of the remaining frames.
    */
    pub fn frames(&mut self) -> Frames<'_> {
        Frames {
            decoder: self,
            stopped: false,
        }
    }

    pub fn state(&self) -> ReaderState {
        self.reader.state()
    }

    pub fn stream_index(&self) -> usize {
        self.reader.stream_index()
    }

    pub fn stream(&self) -> &StreamDescriptor {
        self.reader.decoder().stream()
    }

    /**
        Time base of frame timestamps.
    */
    pub fn time_base(&self) -> Rational {
        self.reader.decoder().time_base()
    }

    pub fn source(&self) -> &MediaSource {
        self.reader.source()
    }
}

impl std::fmt::Debug for VideoDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoDecoder")
            .field("path", &self.source().path())
            .field("reader", &self.reader)
            .finish()
    }
}

/**
    Iterator returned by [`VideoDecoder::frames`].

    Decode errors are yielded in place of the frame they affected and
    iteration continues past them. A container read error is yielded once and
    ends the iteration, since the demuxer would fail the same way again.
*/
#[derive(Debug)]
pub struct Frames<'a> {
    decoder: &'a mut VideoDecoder,
    stopped: bool,
}

impl Iterator for Frames<'_> {
    type Item = Result<VideoFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        let decoder = &mut *self.decoder;
        pull_owned(&mut self.stopped, || {
            let time_base = decoder.time_base();
            decoder
                .next_frame()?
                .map(|frame| frame.to_video_frame(time_base))
                .transpose()
        })
    }
}

fn pull_owned(
    stopped: &mut bool,
    pull: impl FnOnce() -> Result<Option<VideoFrame>>,
) -> Option<Result<VideoFrame>> {
    if *stopped {
        return None;
    }
    match pull() {
        Ok(frame) => frame.map(Ok),
        Err(e @ Error::Demux(_)) => {
            warn!(error = %e, "stopping frame iteration after read error");
            *stopped = true;
            Some(Err(e))
        }
        Err(e) => Some(Err(e)),
    }
}

/**
    Open `path` and decode its first usable video stream.
*/
pub fn open<P: AsRef<Path>>(path: P) -> Result<VideoDecoder> {
    VideoDecoder::open(path, DecoderConfig::default())
}

#[cfg(test)]
mod tests {
    use vidframe_types::{PixelFormat, Pts};

    use super::*;

    fn frame(pts: i64) -> VideoFrame {
        VideoFrame::new(
            vec![0; 6],
            2,
            2,
            PixelFormat::Yuv420p,
            Some(Pts(pts)),
            Rational::new(1, 25),
        )
    }

    #[test]
    fn read_error_ends_iteration() {
        let mut stopped = false;

        let item = pull_owned(&mut stopped, || Err(Error::demux("I/O error")));
        assert!(matches!(item, Some(Err(Error::Demux(_)))));

        let item = pull_owned(&mut stopped, || panic!("pulled after read error"));
        assert!(item.is_none());
    }

    #[test]
    fn decode_error_does_not_end_iteration() {
        let mut stopped = false;

        let item = pull_owned(&mut stopped, || Err(Error::decode("bad slice")));
        assert!(matches!(item, Some(Err(Error::Decode(_)))));

        let item = pull_owned(&mut stopped, || Ok(Some(frame(1))));
        assert_eq!(item.unwrap().unwrap().pts, Some(Pts(1)));

        assert!(pull_owned(&mut stopped, || Ok(None)).is_none());
        assert!(!stopped);
    }
}
