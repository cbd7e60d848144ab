use thiserror::Error;

/**
    Result type used throughout the pipeline.
*/
pub type Result<T, E = Error> = std::result::Result<T, E>;

/**
    Errors produced while opening or driving a decode pipeline.

    "Need more input" and "end of sequence" are not errors and never appear
    here: the first is [`Receive::NeedMoreInput`](crate::Receive) and is
    absorbed by the frame reader, the second is an `Ok(None)` from the reader.
*/
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot open container: {0}")]
    Format(String),

    #[error("cannot read stream info: {0}")]
    StreamInfo(String),

    #[error("no suitable video stream: {0}")]
    StreamNotFound(String),

    #[error("no decoder for codec {0}")]
    DecoderNotFound(String),

    #[error("cannot open codec: {0}")]
    CodecOpen(String),

    #[error("allocation failed: {0}")]
    Allocation(String),

    #[error("demux failed: {0}")]
    Demux(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn stream_info(msg: impl Into<String>) -> Self {
        Self::StreamInfo(msg.into())
    }

    pub fn stream_not_found(msg: impl Into<String>) -> Self {
        Self::StreamNotFound(msg.into())
    }

    pub fn codec_open(msg: impl Into<String>) -> Self {
        Self::CodecOpen(msg.into())
    }

    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    pub fn demux(msg: impl Into<String>) -> Self {
        Self::Demux(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /**
        Returns true for errors raised while building a pipeline, as opposed
        to errors raised by an already running one.
    */
    pub fn is_setup_error(&self) -> bool {
        !matches!(self, Self::Demux(_) | Self::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = Error::decode("invalid NAL unit");
        assert_eq!(err.to_string(), "decode failed: invalid NAL unit");

        let err = Error::DecoderNotFound("vp6f".into());
        assert_eq!(err.to_string(), "no decoder for codec vp6f");
    }

    #[test]
    fn setup_errors_are_distinguished_from_runtime_errors() {
        assert!(Error::format("x").is_setup_error());
        assert!(Error::stream_not_found("x").is_setup_error());
        assert!(Error::allocation("x").is_setup_error());
        assert!(!Error::decode("x").is_setup_error());
        assert!(!Error::demux("x").is_setup_error());
    }
}
