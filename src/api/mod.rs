//! Full API surface (hand-written declarations, no bindgen)
//!
//! One module per enabled library. A library whose feature is off has no
//! module here, so code that touches it fails to compile instead of failing
//! to link. All FFmpeg structs are opaque.
//!
#![cfg_attr(all(feature = "libavutil", feature = "libswscale"), doc = "```no_run")]
#![cfg_attr(
    not(all(feature = "libavutil", feature = "libswscale")),
    doc = "```compile_fail"
)]
//! use ffmpeg_capability_sys::api::{avutil, swscale};
//!
//! let supported = unsafe { swscale::sws_isSupportedInput(0) } != 0;
//! let ptr = unsafe { avutil::av_malloc(16) };
//! unsafe { avutil::av_free(ptr) };
//! # let _ = supported;
//! ```
//!
//! Each library flips independently: libavcodec declarations exist exactly
//! when `libavcodec` is on, whatever else is enabled.
//!
#![cfg_attr(feature = "libavcodec", doc = "```no_run")]
#![cfg_attr(not(feature = "libavcodec"), doc = "```compile_fail")]
//! let runtime = unsafe { ffmpeg_capability_sys::api::avcodec::avcodec_version() };
//! # let _ = runtime;
//! ```
//!
//! Enabling only the version metadata of a library never brings in this
//! module: without the `api` feature the crate has no `api` path at all.

#[cfg(feature = "libavcodec")]
pub mod avcodec;
#[cfg(feature = "libavdevice")]
pub mod avdevice;
#[cfg(feature = "libavfilter")]
pub mod avfilter;
#[cfg(feature = "libavformat")]
pub mod avformat;
#[cfg(feature = "libavutil")]
pub mod avutil;
#[cfg(feature = "libpostproc")]
pub mod postproc;
#[cfg(feature = "libswresample")]
pub mod swresample;
#[cfg(feature = "libswscale")]
pub mod swscale;

#[cfg(feature = "libavutil")]
pub mod error;

// Shared opaque types only exist when some library needs them
#[cfg(any(
    feature = "libavcodec",
    feature = "libavdevice",
    feature = "libavfilter",
    feature = "libavformat",
    feature = "libavutil",
    feature = "libpostproc",
    feature = "libswresample",
    feature = "libswscale"
))]
pub mod types;

pub mod compat;

#[cfg(feature = "libavutil")]
pub use error::{check_error, FFmpegError, FFmpegResult};
#[cfg(any(
    feature = "libavcodec",
    feature = "libavdevice",
    feature = "libavfilter",
    feature = "libavformat",
    feature = "libavutil",
    feature = "libpostproc",
    feature = "libswresample",
    feature = "libswscale"
))]
pub use types::*;
