//! libavformat function declarations
//!
//! Provides muxing and demuxing functionality for container formats.

use super::types::*;
use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_uint, c_void};

// ============================================================================
// Opaque Types (format-specific)
// ============================================================================

/// Opaque AVIOContext structure (I/O abstraction)
#[repr(C)]
pub struct AVIOContext {
    _opaque: [u8; 0],
    _marker: std::marker::PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

/// Opaque AVStream structure (stream within container)
#[repr(C)]
pub struct AVStream {
    _opaque: [u8; 0],
    _marker: std::marker::PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

// ============================================================================
// Callback Types for Custom I/O
// ============================================================================

/// Read callback for custom I/O
///
/// # Returns
/// Number of bytes read, or negative AVERROR on error
pub type ReadPacketFn =
    unsafe extern "C" fn(opaque: *mut c_void, buf: *mut u8, buf_size: c_int) -> c_int;

/// Write callback for custom I/O
///
/// # Returns
/// Number of bytes written, or negative AVERROR on error
pub type WritePacketFn =
    unsafe extern "C" fn(opaque: *mut c_void, buf: *const u8, buf_size: c_int) -> c_int;

/// Seek callback for custom I/O
///
/// `whence` is SEEK_SET, SEEK_CUR, SEEK_END, or AVSEEK_SIZE
pub type SeekFn = unsafe extern "C" fn(opaque: *mut c_void, offset: i64, whence: c_int) -> i64;

extern "C" {
    // ========================================================================
    // Library Information
    // ========================================================================

    /// Return the LIBAVFORMAT_VERSION_INT constant of the linked library
    pub fn avformat_version() -> c_uint;

    /// Return the build-time configuration of the linked library
    pub fn avformat_configuration() -> *const c_char;

    /// Return the license of the linked library
    pub fn avformat_license() -> *const c_char;

    /// Do global initialization of network libraries
    pub fn avformat_network_init() -> c_int;

    /// Undo the initialization done by avformat_network_init
    pub fn avformat_network_deinit() -> c_int;

    // ========================================================================
    // Format Iteration
    // ========================================================================

    /// Iterate over all registered muxers (opaque must point to NULL initially)
    pub fn av_muxer_iterate(opaque: *mut *mut c_void) -> *const AVOutputFormat;

    /// Iterate over all registered demuxers (opaque must point to NULL initially)
    pub fn av_demuxer_iterate(opaque: *mut *mut c_void) -> *const AVInputFormat;

    /// Find an input format by short name
    pub fn av_find_input_format(short_name: *const c_char) -> *const AVInputFormat;

    // ========================================================================
    // Output Context (Muxing)
    // ========================================================================

    /// Allocate an AVFormatContext for output
    ///
    /// # Arguments
    /// * `ctx` - Pointer to receive the allocated context (set to NULL on failure)
    /// * `oformat` - Output format to use (can be NULL to auto-detect)
    /// * `format_name` - Short name of the format (e.g., "mp4", "webm")
    /// * `filename` - Filename for format detection (can be NULL)
    pub fn avformat_alloc_output_context2(
        ctx: *mut *mut AVFormatContext,
        oformat: *const AVOutputFormat,
        format_name: *const c_char,
        filename: *const c_char,
    ) -> c_int;

    /// Allocate an AVFormatContext
    ///
    /// Must be freed with avformat_free_context() or avformat_close_input()
    pub fn avformat_alloc_context() -> *mut AVFormatContext;

    /// Free an AVFormatContext and all its streams
    pub fn avformat_free_context(ctx: *mut AVFormatContext);

    /// Add a new stream to the format context
    pub fn avformat_new_stream(ctx: *mut AVFormatContext, codec: *const AVCodec) -> *mut AVStream;

    /// Write the stream header to the output file
    pub fn avformat_write_header(ctx: *mut AVFormatContext, options: *mut *mut AVDictionary)
    -> c_int;

    /// Write a packet to the output file (interleaved); NULL flushes the queue
    pub fn av_interleaved_write_frame(ctx: *mut AVFormatContext, pkt: *mut AVPacket) -> c_int;

    /// Write a packet to the output file (non-interleaved)
    pub fn av_write_frame(ctx: *mut AVFormatContext, pkt: *mut AVPacket) -> c_int;

    /// Write the stream trailer to the output file
    pub fn av_write_trailer(ctx: *mut AVFormatContext) -> c_int;

    // ========================================================================
    // Input Context (Demuxing)
    // ========================================================================

    /// Open an input stream and read the header
    pub fn avformat_open_input(
        ps: *mut *mut AVFormatContext,
        url: *const c_char,
        fmt: *const AVInputFormat,
        options: *mut *mut AVDictionary,
    ) -> c_int;

    /// Close an opened input AVFormatContext and set *s to NULL
    pub fn avformat_close_input(s: *mut *mut AVFormatContext);

    /// Read packets of a media file to get stream information
    pub fn avformat_find_stream_info(
        ic: *mut AVFormatContext,
        options: *mut *mut AVDictionary,
    ) -> c_int;

    /// Find the "best" stream in the file
    ///
    /// # Returns
    /// * >= 0 on success (stream index)
    /// * AVERROR_STREAM_NOT_FOUND if not found
    /// * AVERROR_DECODER_NOT_FOUND if decoder not found
    pub fn av_find_best_stream(
        ic: *mut AVFormatContext,
        type_: c_int,
        wanted_stream_nb: c_int,
        related_stream: c_int,
        decoder_ret: *mut *const AVCodec,
        flags: c_int,
    ) -> c_int;

    /// Return the next frame of a stream
    pub fn av_read_frame(s: *mut AVFormatContext, pkt: *mut AVPacket) -> c_int;

    /// Seek to a keyframe at the given timestamp
    pub fn av_seek_frame(
        s: *mut AVFormatContext,
        stream_index: c_int,
        timestamp: i64,
        flags: c_int,
    ) -> c_int;

    /// Seek to timestamp with min/max constraints
    pub fn avformat_seek_file(
        s: *mut AVFormatContext,
        stream_index: c_int,
        min_ts: i64,
        ts: i64,
        max_ts: i64,
        flags: c_int,
    ) -> c_int;

    /// Print detailed information about the input or output format
    pub fn av_dump_format(
        ic: *mut AVFormatContext,
        index: c_int,
        url: *const c_char,
        is_output: c_int,
    );

    // ========================================================================
    // Custom I/O
    // ========================================================================

    /// Allocate and initialize an AVIOContext for custom I/O
    ///
    /// # Safety
    /// The buffer must be allocated with av_malloc and remains owned by the AVIOContext
    pub fn avio_alloc_context(
        buffer: *mut u8,
        buffer_size: c_int,
        write_flag: c_int,
        opaque: *mut c_void,
        read_packet: Option<ReadPacketFn>,
        write_packet: Option<WritePacketFn>,
        seek: Option<SeekFn>,
    ) -> *mut AVIOContext;

    /// Free the AVIOContext (the internal buffer is NOT freed)
    pub fn avio_context_free(s: *mut *mut AVIOContext);

    /// Force flushing of buffered data to the output
    pub fn avio_flush(s: *mut AVIOContext);

    /// Open a resource for I/O
    pub fn avio_open(s: *mut *mut AVIOContext, url: *const c_char, flags: c_int) -> c_int;

    /// Open a resource for I/O with additional options
    pub fn avio_open2(
        s: *mut *mut AVIOContext,
        url: *const c_char,
        flags: c_int,
        int_cb: *const c_void,
        options: *mut *mut AVDictionary,
    ) -> c_int;

    /// Close the resource and free the context, setting *s to NULL
    pub fn avio_closep(s: *mut *mut AVIOContext) -> c_int;

    // ========================================================================
    // Format Detection
    // ========================================================================

    /// Guess the output format by short name, filename, or MIME type
    pub fn av_guess_format(
        short_name: *const c_char,
        filename: *const c_char,
        mime_type: *const c_char,
    ) -> *const AVOutputFormat;

    /// Probe the input buffer to determine the input format
    pub fn av_probe_input_buffer2(
        pb: *mut AVIOContext,
        fmt: *mut *const AVInputFormat,
        url: *const c_char,
        logctx: *mut c_void,
        offset: c_uint,
        max_probe_size: c_uint,
    ) -> c_int;
}

// ============================================================================
// Constants
// ============================================================================

/// Seek flags
pub mod seek_flag {
    use std::os::raw::c_int;

    /// Seek backward
    pub const BACKWARD: c_int = 1;
    /// Seeking based on position in bytes
    pub const BYTE: c_int = 2;
    /// Seek to any frame (not just keyframes)
    pub const ANY: c_int = 4;
    /// Seeking based on frame number
    pub const FRAME: c_int = 8;
}

/// Seek whence values
pub mod seek_whence {
    use std::os::raw::c_int;

    pub const SEEK_SET: c_int = 0;
    pub const SEEK_CUR: c_int = 1;
    pub const SEEK_END: c_int = 2;
    /// Return file size (special whence value for seek callback)
    pub const AVSEEK_SIZE: c_int = 0x10000;
    /// Force seek even if not efficient
    pub const AVSEEK_FORCE: c_int = 0x20000;
}

/// AVIO flags
pub mod avio_flag {
    use std::os::raw::c_int;

    pub const READ: c_int = 1;
    pub const WRITE: c_int = 2;
    pub const READ_WRITE: c_int = READ | WRITE;
}

/// Format flags
pub mod avfmt_flag {
    use std::os::raw::c_int;

    /// Demuxer/muxer does not need an opened file
    pub const NOFILE: c_int = 0x0001;
    /// Needs '%d' in filename
    pub const NEEDNUMBER: c_int = 0x0002;
    /// Format wants global header
    pub const GLOBALHEADER: c_int = 0x0040;
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Find output format by short name; NULL if unknown
pub fn find_output_format(short_name: &str) -> *const AVOutputFormat {
    match CString::new(short_name) {
        Ok(c_name) => unsafe { av_guess_format(c_name.as_ptr(), std::ptr::null(), std::ptr::null()) },
        Err(_) => std::ptr::null(),
    }
}

/// Find input format by short name; NULL if unknown
pub fn find_input_format(short_name: &str) -> *const AVInputFormat {
    match CString::new(short_name) {
        Ok(c_name) => unsafe { av_find_input_format(c_name.as_ptr()) },
        Err(_) => std::ptr::null(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_major_matches_headers() {
        let runtime = unsafe { avformat_version() };
        assert_eq!(
            runtime >> 16,
            crate::version::avformat::LIBAVFORMAT_VERSION_MAJOR
        );
    }

    #[test]
    fn test_find_formats() {
        assert!(!find_output_format("matroska").is_null());
        assert!(!find_input_format("matroska").is_null());
        assert!(find_output_format("not-a-container").is_null());
    }

    #[test]
    fn test_muxers_are_registered() {
        let mut opaque: *mut c_void = std::ptr::null_mut();
        assert!(!unsafe { av_muxer_iterate(&mut opaque) }.is_null());
    }

    #[test]
    fn test_alloc_output_context() {
        let name = CString::new("matroska").unwrap();
        let mut ctx: *mut AVFormatContext = std::ptr::null_mut();
        let ret = unsafe {
            avformat_alloc_output_context2(&mut ctx, std::ptr::null(), name.as_ptr(), std::ptr::null())
        };
        assert!(ret >= 0);
        assert!(!ctx.is_null());
        unsafe { avformat_free_context(ctx) };
    }
}
