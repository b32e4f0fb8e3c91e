//! libavdevice function declarations
//!
//! Capture and playback devices, exposed to libavformat as special
//! input/output formats.

use super::types::*;
use std::os::raw::{c_char, c_int, c_uint};

/// One device as reported by `avdevice_list_devices`
#[repr(C)]
pub struct AVDeviceInfo {
    /// Device name, format depends on device
    pub device_name: *mut c_char,
    /// Human friendly name
    pub device_description: *mut c_char,
    /// Array of media types this device provides
    pub media_types: *mut c_int,
    /// Length of `media_types`
    pub nb_media_types: c_int,
}

/// List of devices
#[repr(C)]
pub struct AVDeviceInfoList {
    /// List of autodetected devices
    pub devices: *mut *mut AVDeviceInfo,
    /// Number of autodetected devices
    pub nb_devices: c_int,
    /// Index of default device or -1 if no default
    pub default_device: c_int,
}

extern "C" {
    // ========================================================================
    // Library Information
    // ========================================================================

    /// Return the LIBAVDEVICE_VERSION_INT constant of the linked library
    pub fn avdevice_version() -> c_uint;

    /// Return the build-time configuration of the linked library
    pub fn avdevice_configuration() -> *const c_char;

    /// Return the license of the linked library
    pub fn avdevice_license() -> *const c_char;

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register all input and output devices with libavformat
    pub fn avdevice_register_all();

    // ========================================================================
    // Device Iteration
    // ========================================================================

    /// Audio input devices iterator (NULL to start)
    pub fn av_input_audio_device_next(d: *const AVInputFormat) -> *const AVInputFormat;

    /// Video input devices iterator (NULL to start)
    pub fn av_input_video_device_next(d: *const AVInputFormat) -> *const AVInputFormat;

    /// Audio output devices iterator (NULL to start)
    pub fn av_output_audio_device_next(d: *const AVOutputFormat) -> *const AVOutputFormat;

    /// Video output devices iterator (NULL to start)
    pub fn av_output_video_device_next(d: *const AVOutputFormat) -> *const AVOutputFormat;

    // ========================================================================
    // Device Listing
    // ========================================================================

    /// List devices for an opened device context
    ///
    /// # Returns
    /// Number of autodetected devices, negative AVERROR on error
    pub fn avdevice_list_devices(
        s: *mut AVFormatContext,
        device_list: *mut *mut AVDeviceInfoList,
    ) -> c_int;

    /// List devices of an input device format without opening it first
    pub fn avdevice_list_input_sources(
        device: *const AVInputFormat,
        device_name: *const c_char,
        device_options: *mut AVDictionary,
        device_list: *mut *mut AVDeviceInfoList,
    ) -> c_int;

    /// List devices of an output device format without opening it first
    pub fn avdevice_list_output_sinks(
        device: *const AVOutputFormat,
        device_name: *const c_char,
        device_options: *mut AVDictionary,
        device_list: *mut *mut AVDeviceInfoList,
    ) -> c_int;

    /// Free the list and set *device_list to NULL
    pub fn avdevice_free_list_devices(device_list: *mut *mut AVDeviceInfoList);
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Count the devices reachable through one of the `av_*_device_next`
/// iterators
pub fn count_devices<T>(next: unsafe extern "C" fn(*const T) -> *const T) -> usize {
    let mut count = 0;
    let mut current = std::ptr::null();
    loop {
        current = unsafe { next(current) };
        if current.is_null() {
            return count;
        }
        count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_major_matches_headers() {
        let runtime = unsafe { avdevice_version() };
        assert_eq!(
            runtime >> 16,
            crate::version::avdevice::LIBAVDEVICE_VERSION_MAJOR
        );
    }

    #[test]
    fn test_register_and_iterate() {
        unsafe { avdevice_register_all() };
        // Device availability depends on the FFmpeg build; iteration must terminate.
        let inputs = count_devices(av_input_video_device_next)
            + count_devices(av_input_audio_device_next);
        let outputs = count_devices(av_output_video_device_next)
            + count_devices(av_output_audio_device_next);
        assert!(inputs < 1024 && outputs < 1024);
    }
}
