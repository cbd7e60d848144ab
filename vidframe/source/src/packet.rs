/*!
    Packets read from a [`MediaSource`](crate::MediaSource).
*/

use vidframe_types::{EncodedPacket, MediaDuration, Packet, Pts, Rational};

use crate::convert::pts_from_ffmpeg;

/**
    A compressed packet as read from the container.

    Wraps the FFmpeg packet without copying its payload, so it can be fed
    straight into a codec session. Use [`SourcePacket::to_packet`] to detach
    an owned copy.
*/
pub struct SourcePacket {
    inner: ffmpeg_next::Packet,
    time_base: Rational,
}

impl SourcePacket {
    pub(crate) fn new(inner: ffmpeg_next::Packet, time_base: Rational) -> Self {
        Self { inner, time_base }
    }

    /**
        Time base of this packet's timestamps.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    pub fn duration(&self) -> MediaDuration {
        MediaDuration(self.inner.duration())
    }

    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.inner.data()
    }

    pub fn as_ffmpeg(&self) -> &ffmpeg_next::Packet {
        &self.inner
    }

    pub fn into_ffmpeg(self) -> ffmpeg_next::Packet {
        self.inner
    }

    /**
        Copy this packet into an owned [`Packet`].
    */
    pub fn to_packet(&self) -> Packet {
        Packet {
            data: self.inner.data().map(<[u8]>::to_vec).unwrap_or_default(),
            stream_index: self.inner.stream(),
            pts: self.pts(),
            dts: self.dts(),
            duration: self.duration(),
            time_base: self.time_base,
            is_keyframe: self.inner.is_key(),
        }
    }
}

impl EncodedPacket for SourcePacket {
    fn stream_index(&self) -> usize {
        self.inner.stream()
    }

    fn pts(&self) -> Option<Pts> {
        pts_from_ffmpeg(self.inner.pts())
    }

    fn dts(&self) -> Option<Pts> {
        pts_from_ffmpeg(self.inner.dts())
    }

    fn is_keyframe(&self) -> bool {
        self.inner.is_key()
    }
}

impl std::fmt::Debug for SourcePacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourcePacket")
            .field("stream_index", &self.inner.stream())
            .field("pts", &self.inner.pts())
            .field("dts", &self.inner.dts())
            .field("size", &self.inner.size())
            .field("is_keyframe", &self.inner.is_key())
            .finish()
    }
}
