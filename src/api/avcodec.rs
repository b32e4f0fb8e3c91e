//! libavcodec function declarations
//!
//! Provides encoding and decoding functionality.

use super::types::*;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uint, c_void};

/// Size type of packet side data: `size_t` since FFmpeg 5.0, `int` before
#[cfg(ffmpeg_side_data_size_t)]
pub type SideDataSize = usize;
#[cfg(not(ffmpeg_side_data_size_t))]
pub type SideDataSize = c_int;

extern "C" {
    // ========================================================================
    // Library Information
    // ========================================================================

    /// Return the LIBAVCODEC_VERSION_INT constant of the linked library
    pub fn avcodec_version() -> c_uint;

    /// Return the build-time configuration of the linked library
    pub fn avcodec_configuration() -> *const c_char;

    /// Return the license of the linked library
    pub fn avcodec_license() -> *const c_char;

    // ========================================================================
    // Codec Discovery
    // ========================================================================

    /// Find an encoder by codec ID
    pub fn avcodec_find_encoder(id: c_int) -> *const AVCodec;

    /// Find an encoder by name (e.g., "libx264", "h264_videotoolbox")
    pub fn avcodec_find_encoder_by_name(name: *const c_char) -> *const AVCodec;

    /// Find a decoder by codec ID
    pub fn avcodec_find_decoder(id: c_int) -> *const AVCodec;

    /// Find a decoder by name
    pub fn avcodec_find_decoder_by_name(name: *const c_char) -> *const AVCodec;

    /// Iterate over all registered codecs
    ///
    /// # Arguments
    /// * `opaque` - Iteration state, must point to NULL on the first call
    ///
    /// # Returns
    /// Next codec, or NULL when the iteration is finished
    pub fn av_codec_iterate(opaque: *mut *mut c_void) -> *const AVCodec;

    /// Return non-zero if the codec is an encoder
    pub fn av_codec_is_encoder(codec: *const AVCodec) -> c_int;

    /// Return non-zero if the codec is a decoder
    pub fn av_codec_is_decoder(codec: *const AVCodec) -> c_int;

    // ========================================================================
    // Codec Context Lifecycle
    // ========================================================================

    /// Allocate an AVCodecContext and set its fields to default values
    pub fn avcodec_alloc_context3(codec: *const AVCodec) -> *mut AVCodecContext;

    /// Free the codec context and everything associated with it
    pub fn avcodec_free_context(avctx: *mut *mut AVCodecContext);

    /// Initialize the AVCodecContext to use the given AVCodec
    pub fn avcodec_open2(
        avctx: *mut AVCodecContext,
        codec: *const AVCodec,
        options: *mut *mut AVDictionary,
    ) -> c_int;

    // ========================================================================
    // Encoding (send frame, receive packet)
    // ========================================================================

    /// Supply a raw video or audio frame to the encoder
    ///
    /// # Returns
    /// * 0 on success
    /// * AVERROR(EAGAIN) - output not available, must read with receive_packet first
    /// * AVERROR_EOF - encoder has been flushed, no more output
    /// * AVERROR(EINVAL) - codec not opened, or requires flush
    /// * AVERROR(ENOMEM) - failed to add packet to queue
    pub fn avcodec_send_frame(avctx: *mut AVCodecContext, frame: *const AVFrame) -> c_int;

    /// Read encoded data from the encoder
    ///
    /// # Returns
    /// * 0 on success
    /// * AVERROR(EAGAIN) - output not available, must send more input
    /// * AVERROR_EOF - encoder has been fully flushed
    pub fn avcodec_receive_packet(avctx: *mut AVCodecContext, avpkt: *mut AVPacket) -> c_int;

    // ========================================================================
    // Decoding (send packet, receive frame)
    // ========================================================================

    /// Supply raw packet data to the decoder (NULL packet to flush)
    ///
    /// # Returns
    /// * 0 on success
    /// * AVERROR(EAGAIN) - output not available, must read with receive_frame first
    /// * AVERROR_EOF - decoder has been flushed
    pub fn avcodec_send_packet(avctx: *mut AVCodecContext, avpkt: *const AVPacket) -> c_int;

    /// Return decoded output data from the decoder
    ///
    /// # Returns
    /// * 0 on success
    /// * AVERROR(EAGAIN) - output not available, must send more input
    /// * AVERROR_EOF - decoder has been fully flushed
    pub fn avcodec_receive_frame(avctx: *mut AVCodecContext, frame: *mut AVFrame) -> c_int;

    /// Reset the internal codec state / flush internal buffers
    pub fn avcodec_flush_buffers(avctx: *mut AVCodecContext);

    // ========================================================================
    // Packet Management
    // ========================================================================

    /// Allocate an AVPacket and set its fields to default values
    pub fn av_packet_alloc() -> *mut AVPacket;

    /// Free the packet, if the packet is reference counted, it will be unreferenced first
    pub fn av_packet_free(pkt: *mut *mut AVPacket);

    /// Wipe the packet. Unreference the buffer and reset fields to defaults
    pub fn av_packet_unref(pkt: *mut AVPacket);

    /// Create a new packet that references the same data as src
    pub fn av_packet_ref(dst: *mut AVPacket, src: *const AVPacket) -> c_int;

    /// Create a new packet referencing the same data as src (allocating it)
    pub fn av_packet_clone(src: *const AVPacket) -> *mut AVPacket;

    /// Allocate new buffer for the packet with size bytes
    pub fn av_new_packet(pkt: *mut AVPacket, size: c_int) -> c_int;

    /// Reduce packet size, correctly zeroing padding
    pub fn av_shrink_packet(pkt: *mut AVPacket, size: c_int);

    /// Increase packet size, correctly zeroing padding
    pub fn av_grow_packet(pkt: *mut AVPacket, grow_by: c_int) -> c_int;

    /// Convert valid timing fields in a packet from one time base to another
    pub fn av_packet_rescale_ts(pkt: *mut AVPacket, tb_src: AVRational, tb_dst: AVRational);

    /// Get side data from a packet
    ///
    /// # Returns
    /// Pointer to side data, or NULL if not found
    pub fn av_packet_get_side_data(
        pkt: *const AVPacket,
        type_: c_int,
        size: *mut SideDataSize,
    ) -> *mut u8;

    /// Allocate new side data for a packet
    pub fn av_packet_new_side_data(
        pkt: *mut AVPacket,
        type_: c_int,
        size: SideDataSize,
    ) -> *mut u8;

    // ========================================================================
    // Codec Parameters
    // ========================================================================

    /// Allocate a new AVCodecParameters and set its fields to default values
    pub fn avcodec_parameters_alloc() -> *mut AVCodecParameters;

    /// Free an AVCodecParameters instance
    pub fn avcodec_parameters_free(par: *mut *mut AVCodecParameters);

    /// Copy codec parameters from a codec context to AVCodecParameters
    pub fn avcodec_parameters_from_context(
        par: *mut AVCodecParameters,
        codec: *const AVCodecContext,
    ) -> c_int;

    /// Fill codec context with codec parameters
    pub fn avcodec_parameters_to_context(
        codec: *mut AVCodecContext,
        par: *const AVCodecParameters,
    ) -> c_int;

    /// Copy the contents of src to dst
    pub fn avcodec_parameters_copy(
        dst: *mut AVCodecParameters,
        src: *const AVCodecParameters,
    ) -> c_int;

    // ========================================================================
    // Codec Descriptors
    // ========================================================================

    /// Get the name of a codec
    pub fn avcodec_get_name(id: c_int) -> *const c_char;

    /// Get the media type of a codec ID
    pub fn avcodec_get_type(codec_id: c_int) -> c_int;
}

// ============================================================================
// Codec Context Flags
// ============================================================================

pub mod codec_flag {
    use std::os::raw::c_int;

    /// Use fixed qscale
    pub const QSCALE: c_int = 1 << 1;
    /// Only decode/encode grayscale
    pub const GRAY: c_int = 1 << 13;
    /// Use internal 2pass ratecontrol in first pass mode
    pub const PASS1: c_int = 1 << 9;
    /// Use internal 2pass ratecontrol in second pass mode
    pub const PASS2: c_int = 1 << 10;
    /// Place global headers in extradata instead of every keyframe
    pub const GLOBAL_HEADER: c_int = 1 << 22;
    /// Low delay forcing
    pub const LOW_DELAY: c_int = 1 << 19;
}

/// Thread types for `thread_type`
pub mod thread_type {
    use std::os::raw::c_int;

    /// Decode more than one frame at once
    pub const FRAME: c_int = 0x1;
    /// Decode more than one part of a single frame at once
    pub const SLICE: c_int = 0x2;
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Find encoder by AVCodecID enum
pub fn find_encoder(codec_id: AVCodecID) -> *const AVCodec {
    unsafe { avcodec_find_encoder(codec_id.as_raw()) }
}

/// Find decoder by AVCodecID enum
pub fn find_decoder(codec_id: AVCodecID) -> *const AVCodec {
    unsafe { avcodec_find_decoder(codec_id.as_raw()) }
}

/// Find encoder by name; NULL if not found or the name contains a NUL byte
pub fn find_encoder_by_name(name: &str) -> *const AVCodec {
    match CString::new(name) {
        Ok(c_name) => unsafe { avcodec_find_encoder_by_name(c_name.as_ptr()) },
        Err(_) => std::ptr::null(),
    }
}

/// Find decoder by name; NULL if not found or the name contains a NUL byte
pub fn find_decoder_by_name(name: &str) -> *const AVCodec {
    match CString::new(name) {
        Ok(c_name) => unsafe { avcodec_find_decoder_by_name(c_name.as_ptr()) },
        Err(_) => std::ptr::null(),
    }
}

/// Name FFmpeg uses for a codec ID (e.g. "h264")
pub fn codec_name(codec_id: AVCodecID) -> String {
    unsafe { CStr::from_ptr(avcodec_get_name(codec_id.as_raw())) }
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_major_matches_headers() {
        let runtime = unsafe { avcodec_version() };
        assert_eq!(
            runtime >> 16,
            crate::version::avcodec::LIBAVCODEC_VERSION_MAJOR
        );
    }

    #[test]
    fn test_codec_names() {
        assert_eq!(codec_name(AVCodecID::H264), "h264");
        assert_eq!(codec_name(AVCodecID::Aac), "aac");
    }

    #[test]
    fn test_media_types() {
        assert_eq!(
            unsafe { avcodec_get_type(AVCodecID::Vp9.as_raw()) },
            AVMediaType::Video.as_raw()
        );
        assert_eq!(
            unsafe { avcodec_get_type(AVCodecID::Opus.as_raw()) },
            AVMediaType::Audio.as_raw()
        );
    }

    #[test]
    fn test_find_by_name_rejects_interior_nul() {
        assert!(find_decoder_by_name("h26\04").is_null());
        assert!(find_encoder_by_name("no-such-encoder").is_null());
    }

    #[test]
    fn test_codec_iteration() {
        let mut opaque: *mut c_void = std::ptr::null_mut();
        let mut count = 0;
        loop {
            let codec = unsafe { av_codec_iterate(&mut opaque) };
            if codec.is_null() {
                break;
            }
            let is_coder =
                unsafe { av_codec_is_encoder(codec) != 0 || av_codec_is_decoder(codec) != 0 };
            assert!(is_coder);
            count += 1;
        }
        assert!(count > 0);
    }

    #[test]
    fn test_packet_side_data() {
        // AV_PKT_DATA_NEW_EXTRADATA
        const NEW_EXTRADATA: c_int = 1;
        unsafe {
            let mut pkt = av_packet_alloc();
            assert!(!pkt.is_null());

            let data = av_packet_new_side_data(pkt, NEW_EXTRADATA, 8);
            assert!(!data.is_null());

            let mut size: SideDataSize = 0;
            let found = av_packet_get_side_data(pkt, NEW_EXTRADATA, &mut size);
            assert_eq!(found, data);
            assert_eq!(size, 8);

            av_packet_free(&mut pkt);
            assert!(pkt.is_null());
        }
    }
}
