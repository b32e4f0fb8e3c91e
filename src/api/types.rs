//! Core FFmpeg type definitions shared by the library modules
//!
//! All FFmpeg structs are opaque (zero-sized) to avoid version-specific layout
//! dependencies. These are types only: no symbol here needs a library linked.

use std::marker::PhantomData;
use std::os::raw::c_int;

// ============================================================================
// Rational Number
// ============================================================================

/// Rational number for time bases and frame rates
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AVRational {
    /// Numerator
    pub num: c_int,
    /// Denominator
    pub den: c_int,
}

impl AVRational {
    pub const fn new(num: c_int, den: c_int) -> Self {
        Self { num, den }
    }

    pub fn as_f64(&self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            self.num as f64 / self.den as f64
        }
    }

    /// Microsecond time base (1/1000000), FFmpeg's `AV_TIME_BASE_Q`
    pub const MICROSECONDS: Self = Self {
        num: 1,
        den: AV_TIME_BASE,
    };
}

// ============================================================================
// Media Types
// ============================================================================

/// Stream/codec media type
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AVMediaType {
    Unknown = -1,
    Video = 0,
    Audio = 1,
    Data = 2,
    Subtitle = 3,
    Attachment = 4,
}

impl AVMediaType {
    /// Get the raw FFmpeg media type value
    pub fn as_raw(&self) -> c_int {
        *self as c_int
    }
}

// ============================================================================
// Codec IDs
// ============================================================================

/// Common codec IDs
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AVCodecID {
    None = 0,
    Mjpeg = 7,
    Mpeg4 = 12,
    H264 = 27,
    Png = 61,
    Vp8 = 139,
    Vp9 = 167,
    Hevc = 173,
    Av1 = 226,
    PcmS16le = 0x10000,
    Mp3 = 0x15001,
    Aac = 0x15002,
    Flac = 0x1500c,
    Vorbis = 0x15005,
    Opus = 0x1503c,
}

impl AVCodecID {
    /// Get the raw FFmpeg codec ID value
    pub fn as_raw(&self) -> c_int {
        *self as c_int
    }

    /// Whether this is an audio codec (audio IDs start at 0x10000)
    pub fn is_audio(&self) -> bool {
        self.as_raw() >= 0x10000
    }
}

// ============================================================================
// Pixel Formats
// ============================================================================

/// Video pixel formats (common subset)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AVPixelFormat {
    None = -1,
    // Planar YUV formats
    Yuv420p = 0,
    Yuv422p = 4,
    Yuv444p = 5,
    Yuva420p = 33,
    // Semi-planar formats
    Nv12 = 23,
    Nv21 = 24,
    // Packed formats
    Yuyv422 = 1,
    Rgb24 = 2,
    Bgr24 = 3,
    Gray8 = 8,
    Argb = 25,
    Rgba = 26,
    Abgr = 27,
    Bgra = 28,
    // 10-bit formats
    Yuv420p10le = 64,
}

impl AVPixelFormat {
    /// Get the raw FFmpeg pixel format value
    pub fn as_raw(&self) -> c_int {
        *self as c_int
    }

    /// Number of planes for this pixel format
    pub fn num_planes(&self) -> usize {
        match self {
            Self::Yuv420p | Self::Yuv422p | Self::Yuv444p | Self::Yuv420p10le => 3,
            Self::Yuva420p => 4,
            Self::Nv12 | Self::Nv21 => 2,
            Self::Yuyv422
            | Self::Rgb24
            | Self::Bgr24
            | Self::Gray8
            | Self::Rgba
            | Self::Bgra
            | Self::Argb
            | Self::Abgr => 1,
            Self::None => 0,
        }
    }
}

// ============================================================================
// Sample Formats
// ============================================================================

/// Audio sample formats
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AVSampleFormat {
    None = -1,
    U8 = 0,
    S16 = 1,
    S32 = 2,
    Flt = 3,
    Dbl = 4,
    U8p = 5,
    S16p = 6,
    S32p = 7,
    Fltp = 8,
    Dblp = 9,
    S64 = 10,
    S64p = 11,
}

impl AVSampleFormat {
    /// Get the raw FFmpeg sample format value
    pub fn as_raw(&self) -> c_int {
        *self as c_int
    }

    /// Whether samples are stored one plane per channel
    pub fn is_planar(&self) -> bool {
        matches!(
            self,
            Self::U8p | Self::S16p | Self::S32p | Self::Fltp | Self::Dblp | Self::S64p
        )
    }

    /// Bytes per sample, 0 for `None`
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            Self::None => 0,
            Self::U8 | Self::U8p => 1,
            Self::S16 | Self::S16p => 2,
            Self::S32 | Self::S32p | Self::Flt | Self::Fltp => 4,
            Self::Dbl | Self::Dblp | Self::S64 | Self::S64p => 8,
        }
    }
}

// ============================================================================
// Channel Layout
// ============================================================================

/// Channel layout (FFmpeg 5.1+ `AVChannelLayout`)
///
/// Layout-compatible with the C struct so it can be passed by pointer to
/// `av_channel_layout_*` and `swr_alloc_set_opts2`.
#[cfg(ffmpeg_channel_layout)]
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AVChannelLayout {
    /// Channel order (`AVChannelOrder`)
    pub order: c_int,
    /// Number of channels
    pub nb_channels: c_int,
    /// Channel mask for native order (union with a custom map pointer)
    pub u: u64,
    /// User data
    pub opaque: *mut std::ffi::c_void,
}

// ============================================================================
// Opaque FFmpeg Types
// ============================================================================

macro_rules! opaque_types {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[repr(C)]
            pub struct $name {
                _opaque: [u8; 0],
                _marker: PhantomData<(*mut u8, std::marker::PhantomPinned)>,
            }
        )*
    };
}

opaque_types! {
    /// Opaque AVClass structure (logging/options class descriptor)
    AVClass,
    /// Opaque AVCodec structure (codec implementation descriptor)
    AVCodec,
    /// Opaque AVCodecContext structure (encoder/decoder instance)
    AVCodecContext,
    /// Opaque AVCodecParameters structure (stream codec parameters)
    AVCodecParameters,
    /// Opaque AVFrame structure (uncompressed video/audio data)
    AVFrame,
    /// Opaque AVPacket structure (compressed data)
    AVPacket,
    /// Opaque AVBufferRef structure (reference-counted buffer)
    AVBufferRef,
    /// Opaque AVDictionary structure (key-value options)
    AVDictionary,
    /// Opaque AVFormatContext structure (muxer/demuxer context)
    AVFormatContext,
    /// Opaque AVInputFormat structure (input format or input device descriptor)
    AVInputFormat,
    /// Opaque AVOutputFormat structure (output format or output device descriptor)
    AVOutputFormat,
}

// ============================================================================
// Constants
// ============================================================================

/// Internal time base in ticks per second
pub const AV_TIME_BASE: c_int = 1_000_000;

/// No timestamp value
pub const AV_NOPTS_VALUE: i64 = 0x8000000000000000u64 as i64;

/// Packet flags
pub mod pkt_flag {
    use std::os::raw::c_int;

    pub const KEY: c_int = 0x0001;
    pub const CORRUPT: c_int = 0x0002;
    pub const DISCARD: c_int = 0x0004;
    pub const TRUSTED: c_int = 0x0008;
    pub const DISPOSABLE: c_int = 0x0010;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational() {
        assert_eq!(AVRational::new(1, 2).as_f64(), 0.5);
        assert_eq!(AVRational::new(1, 0).as_f64(), 0.0);
        assert_eq!(AVRational::MICROSECONDS, AVRational::new(1, 1_000_000));
    }

    #[test]
    fn test_codec_id_kind() {
        assert!(!AVCodecID::H264.is_audio());
        assert!(AVCodecID::Opus.is_audio());
        assert!(AVCodecID::PcmS16le.is_audio());
    }

    #[test]
    fn test_sample_format_layout() {
        assert!(AVSampleFormat::Fltp.is_planar());
        assert!(!AVSampleFormat::Flt.is_planar());
        assert_eq!(AVSampleFormat::S16.bytes_per_sample(), 2);
        assert_eq!(AVSampleFormat::Dblp.bytes_per_sample(), 8);
    }

    #[test]
    fn test_pixel_format_planes() {
        assert_eq!(AVPixelFormat::Yuv420p.num_planes(), 3);
        assert_eq!(AVPixelFormat::Nv12.num_planes(), 2);
        assert_eq!(AVPixelFormat::Rgba.num_planes(), 1);
        assert_eq!(AVPixelFormat::None.num_planes(), 0);
    }

    #[cfg(ffmpeg_channel_layout)]
    #[test]
    fn test_channel_layout_size() {
        // order + nb_channels + union + opaque
        let expected = 2 * std::mem::size_of::<c_int>()
            + std::mem::size_of::<u64>()
            + std::mem::size_of::<*mut std::ffi::c_void>();
        assert_eq!(std::mem::size_of::<AVChannelLayout>(), expected);
    }
}
