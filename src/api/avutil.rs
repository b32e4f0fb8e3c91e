//! libavutil function declarations
//!
//! Provides utility functions for memory, frames, options, logging and
//! general helpers.

use super::types::*;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_uint, c_void};

extern "C" {
    // ========================================================================
    // Library Information
    // ========================================================================

    /// Return the LIBAVUTIL_VERSION_INT constant of the linked library
    pub fn avutil_version() -> c_uint;

    /// Return the build-time configuration of the linked library
    pub fn avutil_configuration() -> *const c_char;

    /// Return the license of the linked library
    pub fn avutil_license() -> *const c_char;

    /// Return an informative version string (e.g. "6.1.1" or a git describe)
    pub fn av_version_info() -> *const c_char;

    // ========================================================================
    // Frame Management
    // ========================================================================

    /// Allocate an AVFrame and set its fields to default values
    pub fn av_frame_alloc() -> *mut AVFrame;

    /// Free the frame and any dynamically allocated objects in it
    pub fn av_frame_free(frame: *mut *mut AVFrame);

    /// Set up a new reference to the data described by the frame
    pub fn av_frame_ref(dst: *mut AVFrame, src: *const AVFrame) -> c_int;

    /// Unreference all buffers referenced by frame and reset to defaults
    pub fn av_frame_unref(frame: *mut AVFrame);

    /// Create a new frame that references the same data as src
    pub fn av_frame_clone(src: *const AVFrame) -> *mut AVFrame;

    /// Allocate new buffers for audio or video data based on frame fields
    ///
    /// # Arguments
    /// * `frame` - Frame with format and dimensions (or nb_samples) set
    /// * `align` - Buffer size alignment (0 for default)
    pub fn av_frame_get_buffer(frame: *mut AVFrame, align: c_int) -> c_int;

    /// Ensure the frame is writable, copying data if needed
    pub fn av_frame_make_writable(frame: *mut AVFrame) -> c_int;

    /// Copy frame data from src to dst
    pub fn av_frame_copy(dst: *mut AVFrame, src: *const AVFrame) -> c_int;

    /// Copy only "metadata" fields from src to dst (pts, duration, etc)
    pub fn av_frame_copy_props(dst: *mut AVFrame, src: *const AVFrame) -> c_int;

    /// Check if the frame is writable
    pub fn av_frame_is_writable(frame: *mut AVFrame) -> c_int;

    // ========================================================================
    // Memory Allocation
    // ========================================================================

    /// Allocate a memory block with alignment suitable for all memory accesses
    pub fn av_malloc(size: usize) -> *mut c_void;

    /// Allocate a memory block with alignment suitable for all memory accesses
    /// and zero all the bytes
    pub fn av_mallocz(size: usize) -> *mut c_void;

    /// Allocate, reallocate, or free a block of memory
    pub fn av_realloc(ptr: *mut c_void, size: usize) -> *mut c_void;

    /// Free a memory block which has been allocated with av_malloc
    pub fn av_free(ptr: *mut c_void);

    /// Free a memory block which has been allocated with av_malloc and set ptr to NULL
    pub fn av_freep(ptr: *mut c_void);

    // ========================================================================
    // Buffer Reference Management
    // ========================================================================

    /// Create a new reference to an AVBuffer
    pub fn av_buffer_ref(buf: *const AVBufferRef) -> *mut AVBufferRef;

    /// Free a given reference and automatically free the buffer if no more refs
    pub fn av_buffer_unref(buf: *mut *mut AVBufferRef);

    /// Check if the buffer is writable (only one reference)
    pub fn av_buffer_is_writable(buf: *const AVBufferRef) -> c_int;

    /// Get the opaque pointer passed when the buffer was created
    pub fn av_buffer_get_opaque(buf: *const AVBufferRef) -> *mut c_void;

    // ========================================================================
    // Image Utilities
    // ========================================================================

    /// Get the required buffer size for an image with given dimensions and format
    pub fn av_image_get_buffer_size(
        pix_fmt: c_int,
        width: c_int,
        height: c_int,
        align: c_int,
    ) -> c_int;

    /// Fill plane data pointers and linesizes for an image with given parameters
    pub fn av_image_fill_arrays(
        dst_data: *mut *mut u8,
        dst_linesize: *mut c_int,
        src: *const u8,
        pix_fmt: c_int,
        width: c_int,
        height: c_int,
        align: c_int,
    ) -> c_int;

    /// Copy image data from src to dst
    pub fn av_image_copy(
        dst_data: *mut *mut u8,
        dst_linesizes: *const c_int,
        src_data: *const *const u8,
        src_linesizes: *const c_int,
        pix_fmt: c_int,
        width: c_int,
        height: c_int,
    );

    /// Copy image data to a buffer
    #[allow(clippy::too_many_arguments)]
    pub fn av_image_copy_to_buffer(
        dst: *mut u8,
        dst_size: c_int,
        src_data: *const *const u8,
        src_linesizes: *const c_int,
        pix_fmt: c_int,
        width: c_int,
        height: c_int,
        align: c_int,
    ) -> c_int;

    // ========================================================================
    // Format Names
    // ========================================================================

    /// Return the short name of a pixel format, or NULL if unknown
    pub fn av_get_pix_fmt_name(pix_fmt: c_int) -> *const c_char;

    /// Return the pixel format with the given name, or AV_PIX_FMT_NONE
    pub fn av_get_pix_fmt(name: *const c_char) -> c_int;

    /// Return the name of a sample format, or NULL if unknown
    pub fn av_get_sample_fmt_name(sample_fmt: c_int) -> *const c_char;

    /// Return the number of bytes per sample, 0 for unknown formats
    pub fn av_get_bytes_per_sample(sample_fmt: c_int) -> c_int;

    /// Return a string describing a media type, or NULL if unknown
    pub fn av_get_media_type_string(media_type: c_int) -> *const c_char;

    // ========================================================================
    // Channel Layout
    // ========================================================================

    /// Initialize a channel layout with a default layout for a given number of channels
    #[cfg(ffmpeg_channel_layout)]
    pub fn av_channel_layout_default(ch_layout: *mut AVChannelLayout, nb_channels: c_int);

    /// Free any allocated data in the channel layout and reset it
    #[cfg(ffmpeg_channel_layout)]
    pub fn av_channel_layout_uninit(channel_layout: *mut AVChannelLayout);

    /// Make a copy of a channel layout
    #[cfg(ffmpeg_channel_layout)]
    pub fn av_channel_layout_copy(dst: *mut AVChannelLayout, src: *const AVChannelLayout) -> c_int;

    /// Return the default `AV_CH_LAYOUT_*` mask for a channel count, 0 if none
    #[cfg(ffmpeg_channel_mask)]
    pub fn av_get_default_channel_layout(nb_channels: c_int) -> i64;

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Put a description of the AVERROR code errnum in errbuf
    ///
    /// # Returns
    /// 0 on success, negative if no description was found
    pub fn av_strerror(errnum: c_int, errbuf: *mut c_char, errbuf_size: usize) -> c_int;

    // ========================================================================
    // Time/Timestamp Utilities
    // ========================================================================

    /// Rescale a 64-bit integer by 2 rational numbers
    pub fn av_rescale_q(a: i64, bq: AVRational, cq: AVRational) -> i64;

    /// Rescale a 64-bit integer by 2 rational numbers with rounding
    pub fn av_rescale_q_rnd(a: i64, bq: AVRational, cq: AVRational, rnd: c_int) -> i64;

    /// Compare two timestamps
    pub fn av_compare_ts(ts_a: i64, tb_a: AVRational, ts_b: i64, tb_b: AVRational) -> c_int;

    /// Reduce `num/den` to a fraction whose terms do not exceed `max`
    ///
    /// # Returns
    /// 1 if the reduction is exact, 0 otherwise
    pub fn av_reduce(
        dst_num: *mut c_int,
        dst_den: *mut c_int,
        num: i64,
        den: i64,
        max: i64,
    ) -> c_int;

    // ========================================================================
    // Dictionary (Options)
    // ========================================================================

    /// Set an entry in the dictionary
    pub fn av_dict_set(
        pm: *mut *mut AVDictionary,
        key: *const c_char,
        value: *const c_char,
        flags: c_int,
    ) -> c_int;

    /// Free all memory allocated for an AVDictionary
    pub fn av_dict_free(m: *mut *mut AVDictionary);

    /// Get a dictionary entry with matching key
    pub fn av_dict_get(
        m: *const AVDictionary,
        key: *const c_char,
        prev: *const c_void,
        flags: c_int,
    ) -> *const c_void;

    /// Get the number of entries in the dictionary
    pub fn av_dict_count(m: *const AVDictionary) -> c_int;

    // ========================================================================
    // AVOptions
    // ========================================================================

    /// Set a string option on an AVClass-enabled object
    pub fn av_opt_set(
        obj: *mut c_void,
        name: *const c_char,
        val: *const c_char,
        search_flags: c_int,
    ) -> c_int;

    /// Set an integer option
    pub fn av_opt_set_int(obj: *mut c_void, name: *const c_char, val: i64, search_flags: c_int)
    -> c_int;

    /// Set a sample format option
    pub fn av_opt_set_sample_fmt(
        obj: *mut c_void,
        name: *const c_char,
        fmt: c_int,
        search_flags: c_int,
    ) -> c_int;

    /// Set a channel layout option from an `AV_CH_LAYOUT_*` mask
    #[cfg(ffmpeg_channel_mask)]
    pub fn av_opt_set_channel_layout(
        obj: *mut c_void,
        name: *const c_char,
        ch_layout: i64,
        search_flags: c_int,
    ) -> c_int;

    /// Set a channel layout option
    #[cfg(ffmpeg_channel_layout)]
    pub fn av_opt_set_chlayout(
        obj: *mut c_void,
        name: *const c_char,
        layout: *const AVChannelLayout,
        search_flags: c_int,
    ) -> c_int;

    // ========================================================================
    // Logging
    // ========================================================================

    /// Set the logging level
    pub fn av_log_set_level(level: c_int);

    /// Get the current logging level
    pub fn av_log_get_level() -> c_int;

    /// Send a printf-style message to FFmpeg's log callback
    ///
    /// `avcl` is a pointer to a struct whose first member is an `AVClass`
    /// pointer, or NULL.
    pub fn av_log(avcl: *mut c_void, level: c_int, fmt: *const c_char, ...);
}

// ============================================================================
// Logging Levels
// ============================================================================

pub mod log_level {
    use std::os::raw::c_int;

    pub const QUIET: c_int = -8;
    pub const PANIC: c_int = 0;
    pub const FATAL: c_int = 8;
    pub const ERROR: c_int = 16;
    pub const WARNING: c_int = 24;
    pub const INFO: c_int = 32;
    pub const VERBOSE: c_int = 40;
    pub const DEBUG: c_int = 48;
    pub const TRACE: c_int = 56;
}

// ============================================================================
// Dictionary Flags
// ============================================================================

pub mod dict_flag {
    use std::os::raw::c_int;

    pub const MATCH_CASE: c_int = 1;
    pub const IGNORE_SUFFIX: c_int = 2;
    pub const DONT_STRDUP_KEY: c_int = 4;
    pub const DONT_STRDUP_VAL: c_int = 8;
    pub const DONT_OVERWRITE: c_int = 16;
    pub const APPEND: c_int = 32;
    pub const MULTIKEY: c_int = 64;
}

// ============================================================================
// Option Search Flags
// ============================================================================

pub mod opt_search {
    use std::os::raw::c_int;

    /// Search in possible children of the given object first
    pub const CHILDREN: c_int = 1;
    /// The obj passed is a double pointer to an AVClass
    pub const FAKE_OBJ: c_int = 2;
}

// ============================================================================
// Rounding Modes
// ============================================================================

pub mod rounding {
    use std::os::raw::c_int;

    pub const ZERO: c_int = 0;
    pub const INF: c_int = 1;
    pub const DOWN: c_int = 2;
    pub const UP: c_int = 3;
    pub const NEAR_INF: c_int = 5;
    pub const PASS_MINMAX: c_int = 8192;
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Get the size in bytes needed for a video frame
pub fn image_buffer_size(format: AVPixelFormat, width: i32, height: i32) -> i32 {
    unsafe { av_image_get_buffer_size(format.as_raw(), width, height, 1) }
}

/// Set FFmpeg's global log level (see [`log_level`])
pub fn set_log_level(level: c_int) {
    unsafe { av_log_set_level(level) }
}

/// FFmpeg's current global log level
pub fn log_level() -> c_int {
    unsafe { av_log_get_level() }
}

/// Informative version string of the linked FFmpeg build
pub fn version_info() -> String {
    unsafe { CStr::from_ptr(av_version_info()).to_string_lossy().into_owned() }
}

/// FFmpeg's name for a media type ("video", "audio", ...)
pub fn media_type_name(media_type: AVMediaType) -> Option<&'static str> {
    let name = unsafe { av_get_media_type_string(media_type.as_raw()) };
    if name.is_null() {
        None
    } else {
        unsafe { CStr::from_ptr(name) }.to_str().ok()
    }
}

/// Name of a pixel format as FFmpeg spells it (e.g. "yuv420p")
pub fn pixel_format_name(format: AVPixelFormat) -> Option<String> {
    let name = unsafe { av_get_pix_fmt_name(format.as_raw()) };
    if name.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
    }
}
