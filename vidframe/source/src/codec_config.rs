/*!
    Opaque codec configuration for opening a codec session.
*/

use ffmpeg_next::codec;

use vidframe_types::{Rational, StreamDescriptor};

/**
    Codec parameters copied out of one stream of an open container.

    Holds everything needed to open a decoder for that stream. The parameters
    are an independent copy, so the session opened from them does not alias
    the container's stream table.
*/
pub struct CodecConfig {
    parameters: codec::Parameters,
    stream: StreamDescriptor,
}

impl CodecConfig {
    pub(crate) fn new(parameters: codec::Parameters, stream: StreamDescriptor) -> Self {
        Self { parameters, stream }
    }

    /**
        The stream these parameters were copied from.
    */
    pub fn stream(&self) -> &StreamDescriptor {
        &self.stream
    }

    pub fn stream_index(&self) -> usize {
        self.stream.index
    }

    pub fn time_base(&self) -> Rational {
        self.stream.time_base
    }

    pub fn codec_id(&self) -> codec::Id {
        self.parameters.id()
    }

    /**
        Take the raw FFmpeg parameters, for handing to a decoder context.
    */
    pub fn into_parameters(self) -> codec::Parameters {
        self.parameters
    }
}

impl Clone for CodecConfig {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            stream: self.stream.clone(),
        }
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("codec_id", &self.parameters.id())
            .field("stream_index", &self.stream.index)
            .finish_non_exhaustive()
    }
}
