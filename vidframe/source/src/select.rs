/*!
    Video stream selection.
*/

use vidframe_types::{Error, Result, StreamDescriptor};

/**
    Pick the video stream to decode.

    With `preferred = Some(index)` that stream must exist, carry video and have
    a decoder. With `preferred = None` the streams are scanned in ascending
    index order and the first video stream with a decoder wins; there is no
    ranking between several video streams.

    `has_decoder` reports whether a decoder is available for a stream's codec.
*/
pub fn select_video_stream<F>(
    streams: &[StreamDescriptor],
    preferred: Option<usize>,
    has_decoder: F,
) -> Result<usize>
where
    F: Fn(&StreamDescriptor) -> bool,
{
    let usable = |s: &StreamDescriptor| s.is_video() && has_decoder(s);

    match preferred {
        Some(index) => match streams.iter().find(|s| s.index == index) {
            Some(stream) if usable(stream) => Ok(index),
            Some(stream) => Err(Error::stream_not_found(format!(
                "stream {} is {:?} ({}), not a decodable video stream",
                index, stream.media_type, stream.codec_name
            ))),
            None => Err(Error::stream_not_found(format!(
                "stream {} does not exist ({} streams)",
                index,
                streams.len()
            ))),
        },
        None => {
            let mut sorted: Vec<&StreamDescriptor> = streams.iter().collect();
            sorted.sort_by_key(|s| s.index);
            sorted
                .into_iter()
                .find(|&s| usable(s))
                .map(|s| s.index)
                .ok_or_else(|| {
                    Error::stream_not_found(format!(
                        "none of {} streams is a decodable video stream",
                        streams.len()
                    ))
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use vidframe_types::{CodecId, MediaType, Rational};

    use super::*;

    fn stream(index: usize, media_type: MediaType, codec_id: CodecId) -> StreamDescriptor {
        let name = format!("{codec_id:?}").to_lowercase();
        StreamDescriptor::new(index, media_type, codec_id, name, Rational::new(1, 1000))
    }

    fn audio_video_video() -> Vec<StreamDescriptor> {
        vec![
            stream(0, MediaType::Audio, CodecId::Aac),
            stream(1, MediaType::Video, CodecId::H264),
            stream(2, MediaType::Video, CodecId::Vp9),
        ]
    }

    #[test]
    fn first_video_stream_wins() {
        let streams = audio_video_video();
        assert_eq!(select_video_stream(&streams, None, |_| true).unwrap(), 1);
    }

    #[test]
    fn skips_video_streams_without_decoder() {
        let streams = audio_video_video();
        let index = select_video_stream(&streams, None, |s| s.codec_id != CodecId::H264).unwrap();
        assert_eq!(index, 2);
    }

    #[test]
    fn preferred_video_stream_is_used() {
        let streams = audio_video_video();
        assert_eq!(select_video_stream(&streams, Some(2), |_| true).unwrap(), 2);
    }

    #[test]
    fn preferred_audio_stream_is_rejected() {
        let streams = audio_video_video();
        let err = select_video_stream(&streams, Some(0), |_| true).unwrap_err();
        assert!(matches!(err, Error::StreamNotFound(_)));
    }

    #[test]
    fn preferred_stream_out_of_range_is_rejected() {
        let streams = audio_video_video();
        let err = select_video_stream(&streams, Some(3), |_| true).unwrap_err();
        assert!(matches!(err, Error::StreamNotFound(_)));
    }

    #[test]
    fn preferred_stream_without_decoder_is_rejected() {
        let streams = audio_video_video();
        let err = select_video_stream(&streams, Some(1), |_| false).unwrap_err();
        assert!(matches!(err, Error::StreamNotFound(_)));
    }

    #[test]
    fn audio_only_container_has_no_video_stream() {
        let streams = vec![
            stream(0, MediaType::Audio, CodecId::Aac),
            stream(1, MediaType::Subtitle, CodecId::Unknown),
        ];
        let err = select_video_stream(&streams, None, |_| true).unwrap_err();
        assert!(matches!(err, Error::StreamNotFound(_)));
    }

    #[test]
    fn empty_stream_table() {
        let err = select_video_stream(&[], None, |_| true).unwrap_err();
        assert!(matches!(err, Error::StreamNotFound(_)));
    }
}
