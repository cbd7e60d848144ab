/*!
    Decoder configuration types.
*/

/**
    Configuration for opening a [`VideoDecoder`](crate::VideoDecoder).
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Stream to decode (None = first video stream with a decoder).
    pub preferred_stream: Option<usize>,
    /// Only produce key frames.
    pub keyframes_only: bool,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Decode the given stream instead of the first usable video stream.
    */
    pub fn with_stream(mut self, index: usize) -> Self {
        self.preferred_stream = Some(index);
        self
    }

    /**
        Skip every frame that is not a key frame.

        Non-key packets are dropped by the demuxer where it supports it, and
        the decoder skips any that still arrive.
    */
    pub fn with_keyframes_only(mut self, keyframes_only: bool) -> Self {
        self.keyframes_only = keyframes_only;
        self
    }
}

/**
    Options for opening a [`CodecSession`](crate::CodecSession).
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Ask the codec to skip non-key frames.
    pub skip_non_keyframes: bool,
}

impl From<&DecoderConfig> for SessionOptions {
    fn from(config: &DecoderConfig) -> Self {
        Self {
            skip_non_keyframes: config.keyframes_only,
        }
    }
}
