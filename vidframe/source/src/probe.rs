/*!
    Container opening and stream metadata extraction.
*/

use std::ffi::CString;
use std::path::Path;
use std::ptr;
use std::time::Duration;

use ffmpeg_next::{ffi, format::context::Input as InputContext, media::Type};
use tracing::debug;

use vidframe_types::{Error, Rational, Result, StreamDescriptor};

use crate::convert::{
    codec_id_from_ffmpeg, error_from_ffmpeg, media_type_from_ffmpeg, rational_from_ffmpeg,
};

/**
    Open a container and describe its streams, without keeping it open.

    # Example

    ```ignore
    for stream in vidframe_source::probe("video.mkv")? {
        println!("#{} {:?} {}", stream.index, stream.media_type, stream.codec_name);
    }
    ```
*/
pub fn probe<P: AsRef<Path>>(path: P) -> Result<Vec<StreamDescriptor>> {
    let input = open_input(path.as_ref())?;
    describe_streams(&input)
}

/**
    Open the demuxer and read stream info.

    The two steps are kept apart so an unparseable container reports
    [`Error::Format`] while a container whose streams can't be probed reports
    [`Error::StreamInfo`].
*/
pub(crate) fn open_input(path: &Path) -> Result<InputContext> {
    let path_str = path
        .to_str()
        .ok_or_else(|| Error::invalid_argument(format!("non UTF-8 path {}", path.display())))?;
    if path_str.is_empty() {
        return Err(Error::invalid_argument("empty path"));
    }
    let c_path = CString::new(path_str)
        .map_err(|_| Error::invalid_argument(format!("path contains NUL: {path_str}")))?;

    ffmpeg_next::init().map_err(|e| error_from_ffmpeg(e, Error::Format))?;

    // SAFETY: `ctx` starts null so avformat_open_input allocates it, and frees
    // it itself on failure. After a successful open we either close it on the
    // stream info error path or hand ownership to `InputContext`, whose
    // destructor closes it exactly once.
    unsafe {
        let mut ctx = ptr::null_mut();
        let rc = ffi::avformat_open_input(
            &mut ctx,
            c_path.as_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
        );
        if rc < 0 {
            let err = ffmpeg_next::Error::from(rc);
            debug!(path = %path.display(), error = %err, "failed to open container");
            return Err(error_from_ffmpeg(err, Error::Format));
        }

        let rc = ffi::avformat_find_stream_info(ctx, ptr::null_mut());
        if rc < 0 {
            ffi::avformat_close_input(&mut ctx);
            let err = ffmpeg_next::Error::from(rc);
            debug!(path = %path.display(), error = %err, "failed to read stream info");
            return Err(error_from_ffmpeg(err, Error::StreamInfo));
        }

        Ok(InputContext::wrap(ctx))
    }
}

/**
    Build the stream table of an open container, in stream index order.
*/
pub(crate) fn describe_streams(input: &InputContext) -> Result<Vec<StreamDescriptor>> {
    let mut streams = Vec::new();

    for stream in input.streams() {
        let index = stream.index();
        let parameters = stream.parameters();
        let codec = parameters.id();
        let medium = parameters.medium();

        let time_base = rational_from_ffmpeg(stream.time_base());
        if !is_usable_time_base(time_base) {
            return Err(Error::stream_info(format!(
                "stream {index} has no usable time base ({time_base})"
            )));
        }

        let mut descriptor = StreamDescriptor::new(
            index,
            media_type_from_ffmpeg(medium),
            codec_id_from_ffmpeg(codec),
            codec.name(),
            time_base,
        );

        descriptor.duration = duration_from_ticks(stream.duration(), time_base);

        if medium == Type::Video {
            descriptor.frame_rate = if stream.avg_frame_rate().numerator() != 0 {
                Some(rational_from_ffmpeg(stream.avg_frame_rate()))
            } else if stream.rate().numerator() != 0 {
                Some(rational_from_ffmpeg(stream.rate()))
            } else {
                None
            };

            // SAFETY: reading plain fields of the AVCodecParameters owned by
            // this stream, which outlives the borrow.
            let (width, height) = unsafe {
                let ptr = parameters.as_ptr();
                ((*ptr).width, (*ptr).height)
            };
            descriptor.width = u32::try_from(width).ok().filter(|w| *w > 0);
            descriptor.height = u32::try_from(height).ok().filter(|h| *h > 0);
        }

        streams.push(descriptor);
    }

    streams.sort_by_key(|s| s.index);
    Ok(streams)
}

fn is_usable_time_base(time_base: Rational) -> bool {
    time_base.num > 0 && time_base.den > 0
}

/**
    Convert a stream duration in time base ticks, or `None` if it is unset,
    negative or does not fit a [`Duration`].
*/
fn duration_from_ticks(ticks: i64, time_base: Rational) -> Option<Duration> {
    if ticks <= 0 || !is_usable_time_base(time_base) {
        return None;
    }
    Duration::try_from_secs_f64(ticks as f64 * time_base.to_f64()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_invalid() {
        let err = open_input(Path::new("")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{err}");
    }

    #[test]
    fn path_with_nul_is_invalid() {
        let err = open_input(Path::new("clip\0.mkv")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_is_invalid() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"clip\xff.mkv"));
        let err = open_input(path).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{err}");
    }

    #[test]
    fn time_base_needs_positive_terms() {
        assert!(is_usable_time_base(Rational::new(1, 90_000)));
        assert!(!is_usable_time_base(Rational::new(0, 1)));
        assert!(!is_usable_time_base(Rational::new(-1, 25)));
        assert!(!is_usable_time_base(Rational::new(1, -25)));
    }

    #[test]
    fn stream_duration_from_ticks() {
        assert_eq!(
            duration_from_ticks(960, Rational::new(1, 1000)),
            Some(Duration::from_millis(960))
        );
        assert_eq!(duration_from_ticks(0, Rational::new(1, 1000)), None);
        assert_eq!(duration_from_ticks(-40, Rational::new(1, 1000)), None);
        assert_eq!(duration_from_ticks(40, Rational::new(-1, 1000)), None);
        assert_eq!(duration_from_ticks(i64::MAX, Rational::new(i32::MAX, 1)), None);
    }
}
