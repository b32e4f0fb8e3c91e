//! libswresample function declarations
//!
//! Provides audio resampling and format conversion functionality.
//! This is the audio equivalent of libswscale for video.

use super::types::*;
use std::os::raw::{c_char, c_int, c_uint};

/// Opaque SwrContext structure (software resampler context)
#[repr(C)]
pub struct SwrContext {
    _opaque: [u8; 0],
    _marker: std::marker::PhantomData<(*mut u8, std::marker::PhantomPinned)>,
}

extern "C" {
    // ========================================================================
    // Library Information
    // ========================================================================

    /// Return the LIBSWRESAMPLE_VERSION_INT constant of the linked library
    pub fn swresample_version() -> c_uint;

    /// Return the build-time configuration of the linked library
    pub fn swresample_configuration() -> *const c_char;

    /// Return the license of the linked library
    pub fn swresample_license() -> *const c_char;

    // ========================================================================
    // Context Management
    // ========================================================================

    /// Allocate an empty SwrContext
    ///
    /// This must be followed by swr_alloc_set_opts* and swr_init.
    /// Alternatively, use swr_alloc_set_opts for older FFmpeg versions.
    pub fn swr_alloc() -> *mut SwrContext;

    /// Free the given SwrContext and set the pointer to NULL
    pub fn swr_free(s: *mut *mut SwrContext);

    /// Close the context and free internal allocations, but keep the
    /// context available for reuse.
    ///
    /// Call swr_init to reinitialize after this.
    pub fn swr_close(s: *mut SwrContext);

    /// Initialize context after setting user parameters
    ///
    /// # Returns
    /// 0 on success, negative AVERROR code on failure
    pub fn swr_init(s: *mut SwrContext) -> c_int;

    /// Check if context needs to be re-initialized
    ///
    /// Returns 1 if swresample reinitialization is needed, 0 otherwise
    pub fn swr_is_initialized(s: *const SwrContext) -> c_int;

    /// Allocate and set options in one call
    ///
    /// # Arguments
    /// * `ps` - Pointer to SwrContext pointer (will be allocated if NULL)
    /// * `out_ch_layout` - Output channel layout
    /// * `out_sample_fmt` - Output sample format
    /// * `out_sample_rate` - Output sample rate
    /// * `in_ch_layout` - Input channel layout
    /// * `in_sample_fmt` - Input sample format
    /// * `in_sample_rate` - Input sample rate
    /// * `log_offset` - Logging offset (usually 0)
    /// * `log_ctx` - Logging context (usually NULL)
    ///
    /// # Returns
    /// 0 on success, negative AVERROR code on failure
    #[cfg(ffmpeg_swr_alloc_set_opts2)]
    #[allow(clippy::too_many_arguments)]
    pub fn swr_alloc_set_opts2(
        ps: *mut *mut SwrContext,
        out_ch_layout: *const AVChannelLayout,
        out_sample_fmt: c_int,
        out_sample_rate: c_int,
        in_ch_layout: *const AVChannelLayout,
        in_sample_fmt: c_int,
        in_sample_rate: c_int,
        log_offset: c_int,
        log_ctx: *mut std::ffi::c_void,
    ) -> c_int;

    /// Allocate and set options from `AV_CH_LAYOUT_*` channel masks
    ///
    /// # Returns
    /// `s`, or a newly allocated context when `s` is NULL; NULL on failure
    #[cfg(ffmpeg_swr_alloc_set_opts)]
    #[allow(clippy::too_many_arguments)]
    pub fn swr_alloc_set_opts(
        s: *mut SwrContext,
        out_ch_layout: i64,
        out_sample_fmt: c_int,
        out_sample_rate: c_int,
        in_ch_layout: i64,
        in_sample_fmt: c_int,
        in_sample_rate: c_int,
        log_offset: c_int,
        log_ctx: *mut std::ffi::c_void,
    ) -> *mut SwrContext;

    // ========================================================================
    // Conversion Operations
    // ========================================================================

    /// Convert audio data
    ///
    /// # Arguments
    /// * `s` - SwrContext
    /// * `out` - Output buffers (one per channel for planar, one for interleaved)
    /// * `out_count` - Amount of space available for output in samples per channel
    /// * `in_` - Input buffers (one per channel for planar, one for interleaved)
    /// * `in_count` - Number of input samples available in one channel
    ///
    /// # Returns
    /// Number of samples output per channel, or negative AVERROR code on error
    ///
    /// # Notes
    /// - If out or in_count is 0, swr_convert will do nothing
    /// - in_count of 0 can be used for flushing remaining samples
    /// - out can be NULL to read buffered samples
    pub fn swr_convert(
        s: *mut SwrContext,
        out: *mut *mut u8,
        out_count: c_int,
        r#in: *const *const u8,
        in_count: c_int,
    ) -> c_int;

    /// Convert audio using AVFrame structures
    ///
    /// # Arguments
    /// * `s` - SwrContext
    /// * `output` - Destination frame (allocates buffers if NULL data pointers)
    /// * `input` - Source frame
    ///
    /// # Returns
    /// 0 on success, negative AVERROR code on failure
    pub fn swr_convert_frame(
        s: *mut SwrContext,
        output: *mut AVFrame,
        input: *const AVFrame,
    ) -> c_int;

    /// Configure or reconfigure the SwrContext using AVFrame parameters
    ///
    /// Drops existing conversion configuration and uses the provided frames
    /// as templates for parameters.
    ///
    /// # Arguments
    /// * `s` - SwrContext
    /// * `output` - Output frame template
    /// * `input` - Input frame template
    ///
    /// # Returns
    /// 0 on success, negative AVERROR code on failure
    pub fn swr_config_frame(
        s: *mut SwrContext,
        output: *const AVFrame,
        input: *const AVFrame,
    ) -> c_int;

    // ========================================================================
    // Delay and Buffer Management
    // ========================================================================

    /// Get the delay (buffered samples) in the resampler
    ///
    /// # Arguments
    /// * `s` - SwrContext
    /// * `base` - Time base (e.g., 1 for samples, sample_rate for seconds)
    ///
    /// # Returns
    /// Delay in the given time base
    pub fn swr_get_delay(s: *const SwrContext, base: i64) -> i64;

    /// Get the number of samples needed for the next swr_convert call
    ///
    /// For accurate calculation, this needs the actual samples to be converted.
    ///
    /// # Arguments
    /// * `s` - SwrContext
    /// * `in_samples` - Number of input samples
    ///
    /// # Returns
    /// Upper bound on the number of output samples
    pub fn swr_get_out_samples(s: *const SwrContext, in_samples: c_int) -> c_int;

    /// Drops the specified number of output samples
    ///
    /// # Arguments
    /// * `s` - SwrContext
    /// * `count` - Number of samples to drop
    ///
    /// # Returns
    /// Number of samples dropped, or negative AVERROR on error
    pub fn swr_drop_output(s: *mut SwrContext, count: c_int) -> c_int;

    /// Injects the specified number of silence samples
    ///
    /// # Arguments
    /// * `s` - SwrContext
    /// * `count` - Number of silence samples to inject
    ///
    /// # Returns
    /// Number of samples injected, or negative AVERROR on error
    pub fn swr_inject_silence(s: *mut SwrContext, count: c_int) -> c_int;
}

// ============================================================================
// Dithering Modes
// ============================================================================

/// No dithering
pub const SWR_DITHER_NONE: c_int = 0;

/// Rectangular dithering
pub const SWR_DITHER_RECTANGULAR: c_int = 1;

/// Triangular dithering
pub const SWR_DITHER_TRIANGULAR: c_int = 2;

/// Triangular high-pass dithering
pub const SWR_DITHER_TRIANGULAR_HIGHPASS: c_int = 3;

// ============================================================================
// Engine Selection
// ============================================================================

/// Software engine (default)
pub const SWR_ENGINE_SWR: c_int = 0;

/// SOX resampler engine
pub const SWR_ENGINE_SOXR: c_int = 1;

// ============================================================================
// Filter Type
// ============================================================================

/// Cubic filter
pub const SWR_FILTER_TYPE_CUBIC: c_int = 0;

/// Blackman-Nuttall windowed sinc
pub const SWR_FILTER_TYPE_BLACKMAN_NUTTALL: c_int = 1;

/// Kaiser windowed sinc
pub const SWR_FILTER_TYPE_KAISER: c_int = 2;

// ============================================================================
// Helper Functions
// ============================================================================

/// Create and configure a SwrContext using simple parameters
///
/// Default channel layouts come from libavutil, so this helper needs both
/// features. Headers declaring `AVChannelLayout` go through
/// `swr_alloc_set_opts2`; older ones through `swr_alloc_set_opts` with
/// channel masks.
///
/// # Arguments
/// * `out_channels` - Number of output channels
/// * `out_sample_rate` - Output sample rate
/// * `out_sample_fmt` - Output sample format
/// * `in_channels` - Number of input channels
/// * `in_sample_rate` - Input sample rate
/// * `in_sample_fmt` - Input sample format
///
/// # Returns
/// Configured and initialized SwrContext, or NULL on error
///
/// # Safety
/// This function is unsafe because it calls FFmpeg C functions that allocate
/// memory and require proper initialization. The returned pointer must be
/// freed with `swr_free` when no longer needed.
#[cfg(all(
    feature = "libavutil",
    any(
        all(ffmpeg_channel_layout, ffmpeg_swr_alloc_set_opts2),
        all(ffmpeg_channel_mask, ffmpeg_swr_alloc_set_opts)
    )
))]
pub unsafe fn create_resampler(
    out_channels: u32,
    out_sample_rate: u32,
    out_sample_fmt: AVSampleFormat,
    in_channels: u32,
    in_sample_rate: u32,
    in_sample_fmt: AVSampleFormat,
) -> *mut SwrContext {
    unsafe {
        let ctx = alloc_resampler(
            out_channels as c_int,
            out_sample_rate as c_int,
            out_sample_fmt,
            in_channels as c_int,
            in_sample_rate as c_int,
            in_sample_fmt,
        );
        if ctx.is_null() {
            return std::ptr::null_mut();
        }

        if swr_init(ctx) < 0 {
            let mut ctx_ptr = ctx;
            swr_free(&mut ctx_ptr);
            return std::ptr::null_mut();
        }

        ctx
    }
}

#[cfg(all(
    feature = "libavutil",
    ffmpeg_channel_layout,
    ffmpeg_swr_alloc_set_opts2
))]
unsafe fn alloc_resampler(
    out_channels: c_int,
    out_sample_rate: c_int,
    out_sample_fmt: AVSampleFormat,
    in_channels: c_int,
    in_sample_rate: c_int,
    in_sample_fmt: AVSampleFormat,
) -> *mut SwrContext {
    use super::avutil::{av_channel_layout_default, av_channel_layout_uninit};

    unsafe {
        let mut out_ch_layout: AVChannelLayout = std::mem::zeroed();
        let mut in_ch_layout: AVChannelLayout = std::mem::zeroed();

        av_channel_layout_default(&mut out_ch_layout, out_channels);
        av_channel_layout_default(&mut in_ch_layout, in_channels);

        let mut ctx: *mut SwrContext = std::ptr::null_mut();

        let ret = swr_alloc_set_opts2(
            &mut ctx,
            &out_ch_layout,
            out_sample_fmt.as_raw(),
            out_sample_rate,
            &in_ch_layout,
            in_sample_fmt.as_raw(),
            in_sample_rate,
            0,
            std::ptr::null_mut(),
        );

        av_channel_layout_uninit(&mut out_ch_layout);
        av_channel_layout_uninit(&mut in_ch_layout);

        if ret < 0 {
            swr_free(&mut ctx);
        }
        ctx
    }
}

#[cfg(all(
    feature = "libavutil",
    not(all(ffmpeg_channel_layout, ffmpeg_swr_alloc_set_opts2)),
    ffmpeg_channel_mask,
    ffmpeg_swr_alloc_set_opts
))]
unsafe fn alloc_resampler(
    out_channels: c_int,
    out_sample_rate: c_int,
    out_sample_fmt: AVSampleFormat,
    in_channels: c_int,
    in_sample_rate: c_int,
    in_sample_fmt: AVSampleFormat,
) -> *mut SwrContext {
    use super::avutil::av_get_default_channel_layout;

    unsafe {
        let out_mask = av_get_default_channel_layout(out_channels);
        let in_mask = av_get_default_channel_layout(in_channels);
        if out_mask == 0 || in_mask == 0 {
            return std::ptr::null_mut();
        }

        swr_alloc_set_opts(
            std::ptr::null_mut(),
            out_mask,
            out_sample_fmt.as_raw(),
            out_sample_rate,
            in_mask,
            in_sample_fmt.as_raw(),
            in_sample_rate,
            0,
            std::ptr::null_mut(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_major_matches_headers() {
        let runtime = unsafe { swresample_version() };
        assert_eq!(
            runtime >> 16,
            crate::version::swresample::LIBSWRESAMPLE_VERSION_MAJOR
        );
    }

    #[test]
    #[cfg(feature = "libavutil")]
    fn test_create_resampler() {
        unsafe {
            let ctx = create_resampler(2, 44100, AVSampleFormat::S16, 2, 48000, AVSampleFormat::Fltp);
            assert!(!ctx.is_null());
            assert!(swr_is_initialized(ctx) != 0);
            assert!(swr_get_out_samples(ctx, 480) > 0);
            let mut ctx = ctx;
            swr_free(&mut ctx);
            assert!(ctx.is_null());
        }
    }

    #[test]
    #[cfg(feature = "libavutil")]
    fn test_create_resampler_rejects_zero_rate() {
        unsafe {
            let ctx = create_resampler(2, 0, AVSampleFormat::S16, 2, 48000, AVSampleFormat::Fltp);
            assert!(ctx.is_null());
        }
    }
}
