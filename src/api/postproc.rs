//! libpostproc function declarations
//!
//! Deblocking, deringing and other legacy postprocessing filters. The library
//! is GPL licensed, so FFmpeg must be configured with `--enable-gpl`.

use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_uint, c_void};

/// Opaque pp_mode (parsed filter chain)
pub type pp_mode = c_void;

/// Opaque pp_context (per-resolution state)
pub type pp_context = c_void;

extern "C" {
    // ========================================================================
    // Library Information
    // ========================================================================

    /// Return the LIBPOSTPROC_VERSION_INT constant of the linked library
    pub fn postproc_version() -> c_uint;

    /// Return the build-time configuration of the linked library
    pub fn postproc_configuration() -> *const c_char;

    /// Return the license of the linked library
    pub fn postproc_license() -> *const c_char;

    // ========================================================================
    // Modes
    // ========================================================================

    /// Parse a filter chain description ("de", "hb:a,vb:a", ...)
    ///
    /// # Arguments
    /// * `name` - Filter chain
    /// * `quality` - 0 (fastest) to PP_QUALITY_MAX
    ///
    /// # Returns
    /// Mode to pass to pp_postprocess, or NULL on parse error
    pub fn pp_get_mode_by_name_and_quality(name: *const c_char, quality: c_int) -> *mut pp_mode;

    /// Free a mode returned by pp_get_mode_by_name_and_quality
    pub fn pp_free_mode(mode: *mut pp_mode);

    // ========================================================================
    // Contexts
    // ========================================================================

    /// Allocate a context for frames of the given size
    ///
    /// `flags` combines one PP_FORMAT_* value with PP_CPU_CAPS_* bits
    pub fn pp_get_context(width: c_int, height: c_int, flags: c_int) -> *mut pp_context;

    /// Free a context
    pub fn pp_free_context(pp_context: *mut pp_context);

    /// Filter one frame
    ///
    /// `qp_store` may be NULL, in which case a constant QP is assumed.
    pub fn pp_postprocess(
        src: *const *const u8,
        src_stride: *const c_int,
        dst: *mut *mut u8,
        dst_stride: *const c_int,
        horizontal_size: c_int,
        vertical_size: c_int,
        qp_store: *const i8,
        qp_stride: c_int,
        mode: *mut pp_mode,
        pp_context: *mut pp_context,
        pict_type: c_int,
    );
}

/// Highest quality accepted by `pp_get_mode_by_name_and_quality`
pub const PP_QUALITY_MAX: c_int = 6;

/// CPU capability flags for `pp_get_context`
pub mod cpu_caps {
    use std::os::raw::c_int;

    pub const MMX: c_int = 0x80000000u32 as c_int;
    pub const MMX2: c_int = 0x20000000;
    pub const THREE_DNOW: c_int = 0x40000000;
    pub const ALTIVEC: c_int = 0x10000000;
    /// Detect at runtime
    pub const AUTO: c_int = 0x00080000;
}

/// Chroma subsampling of the frames a context processes
pub mod format {
    use std::os::raw::c_int;

    const PP_FORMAT: c_int = 0x00000008;

    pub const YUV420: c_int = 0x00000011 | PP_FORMAT;
    pub const YUV422: c_int = 0x00000001 | PP_FORMAT;
    pub const YUV411: c_int = 0x00000002 | PP_FORMAT;
    pub const YUV444: c_int = PP_FORMAT;
    pub const YUV440: c_int = 0x00000010 | PP_FORMAT;
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a filter chain; NULL if the description is invalid
pub fn mode_by_name(name: &str, quality: c_int) -> *mut pp_mode {
    match CString::new(name) {
        Ok(c_name) => unsafe {
            pp_get_mode_by_name_and_quality(c_name.as_ptr(), quality.clamp(0, PP_QUALITY_MAX))
        },
        Err(_) => std::ptr::null_mut(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_major_matches_headers() {
        let runtime = unsafe { postproc_version() };
        assert_eq!(
            runtime >> 16,
            crate::version::postproc::LIBPOSTPROC_VERSION_MAJOR
        );
    }

    #[test]
    fn test_license_is_gpl() {
        let license = unsafe { std::ffi::CStr::from_ptr(postproc_license()) };
        assert!(license.to_string_lossy().contains("GPL"));
    }

    #[test]
    fn test_filter_one_frame() {
        const W: c_int = 16;
        const H: c_int = 16;

        let mode = mode_by_name("de", PP_QUALITY_MAX);
        assert!(!mode.is_null());
        let ctx = unsafe { pp_get_context(W, H, format::YUV420 | cpu_caps::AUTO) };
        assert!(!ctx.is_null());

        let luma = vec![128u8; (W * H) as usize];
        let chroma = vec![128u8; (W * H / 4) as usize];
        let mut out_luma = vec![0u8; luma.len()];
        let mut out_u = vec![0u8; chroma.len()];
        let mut out_v = vec![0u8; chroma.len()];

        let src = [luma.as_ptr(), chroma.as_ptr(), chroma.as_ptr()];
        let mut dst = [out_luma.as_mut_ptr(), out_u.as_mut_ptr(), out_v.as_mut_ptr()];
        let stride = [W, W / 2, W / 2];

        unsafe {
            pp_postprocess(
                src.as_ptr(),
                stride.as_ptr(),
                dst.as_mut_ptr(),
                stride.as_ptr(),
                W,
                H,
                std::ptr::null(),
                0,
                mode,
                ctx,
                0,
            );
            pp_free_context(ctx);
            pp_free_mode(mode);
        }

        // Flat input stays flat
        assert!(out_luma.iter().all(|&p| p == 128));
    }

    #[test]
    fn test_invalid_mode() {
        assert!(mode_by_name("bad\0name", 3).is_null());
    }
}
