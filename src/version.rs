//! Version metadata surface
//!
//! For every enabled library, `version::<lib>` carries the version constants
//! of the headers this crate was built against. Nothing here references a
//! function exported by the FFmpeg libraries, so the module is usable in a
//! build without the `api` feature, where no FFmpeg library gets linked.
//!
//! Libraries that were not enabled have no module at all:
//!
#![cfg_attr(feature = "libavcodec", doc = "```no_run")]
#![cfg_attr(not(feature = "libavcodec"), doc = "```compile_fail")]
//! let _ = ffmpeg_capability_sys::version::avcodec::LIBAVCODEC_VERSION_MAJOR;
//! ```
//!
#![cfg_attr(feature = "libswscale", doc = "```no_run")]
#![cfg_attr(not(feature = "libswscale"), doc = "```compile_fail")]
//! let _ = ffmpeg_capability_sys::version::swscale::LIBSWSCALE_VERSION;
//! ```

use crate::library::{Capabilities, Library};
use crate::LibraryVersion;

macro_rules! version_module {
    ($feature:literal, $module:ident, $probe:ident) => {
        #[cfg(feature = $feature)]
        pub mod $module {
            include!(concat!(env!("OUT_DIR"), "/version_", stringify!($module), ".rs"));

            extern "C" {
                /// `AV_VERSION_INT` as evaluated by the C preprocessor in the probe
                pub(crate) fn $probe() -> std::os::raw::c_uint;
            }
        }
    };
}

version_module!("libavcodec", avcodec, ffcap_header_version_avcodec);
version_module!("libavdevice", avdevice, ffcap_header_version_avdevice);
version_module!("libavfilter", avfilter, ffcap_header_version_avfilter);
version_module!("libavformat", avformat, ffcap_header_version_avformat);
version_module!("libavutil", avutil, ffcap_header_version_avutil);
version_module!("libpostproc", postproc, ffcap_header_version_postproc);
version_module!("libswresample", swresample, ffcap_header_version_swresample);
version_module!("libswscale", swscale, ffcap_header_version_swscale);

/// Header version of `library`, or `None` when it was not enabled
pub const fn header_version(library: Library) -> Option<LibraryVersion> {
    match library {
        #[cfg(feature = "libavcodec")]
        Library::Avcodec => Some(avcodec::LIBAVCODEC_VERSION),
        #[cfg(feature = "libavdevice")]
        Library::Avdevice => Some(avdevice::LIBAVDEVICE_VERSION),
        #[cfg(feature = "libavfilter")]
        Library::Avfilter => Some(avfilter::LIBAVFILTER_VERSION),
        #[cfg(feature = "libavformat")]
        Library::Avformat => Some(avformat::LIBAVFORMAT_VERSION),
        #[cfg(feature = "libavutil")]
        Library::Avutil => Some(avutil::LIBAVUTIL_VERSION),
        #[cfg(feature = "libpostproc")]
        Library::Postproc => Some(postproc::LIBPOSTPROC_VERSION),
        #[cfg(feature = "libswresample")]
        Library::Swresample => Some(swresample::LIBSWRESAMPLE_VERSION),
        #[cfg(feature = "libswscale")]
        Library::Swscale => Some(swscale::LIBSWSCALE_VERSION),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Header versions of every enabled library, in feature-flag order
pub fn header_versions() -> Vec<(Library, LibraryVersion)> {
    Capabilities::current()
        .iter()
        .filter_map(|lib| header_version(lib).map(|version| (lib, version)))
        .collect()
}

/// `LIB*_VERSION_INT` as the C preprocessor saw it when compiling the probe.
///
/// Agrees with [`header_version`] unless the headers changed between the two
/// build steps.
pub fn probed_version_int(library: Library) -> Option<u32> {
    match library {
        #[cfg(feature = "libavcodec")]
        Library::Avcodec => Some(unsafe { avcodec::ffcap_header_version_avcodec() }),
        #[cfg(feature = "libavdevice")]
        Library::Avdevice => Some(unsafe { avdevice::ffcap_header_version_avdevice() }),
        #[cfg(feature = "libavfilter")]
        Library::Avfilter => Some(unsafe { avfilter::ffcap_header_version_avfilter() }),
        #[cfg(feature = "libavformat")]
        Library::Avformat => Some(unsafe { avformat::ffcap_header_version_avformat() }),
        #[cfg(feature = "libavutil")]
        Library::Avutil => Some(unsafe { avutil::ffcap_header_version_avutil() }),
        #[cfg(feature = "libpostproc")]
        Library::Postproc => Some(unsafe { postproc::ffcap_header_version_postproc() }),
        #[cfg(feature = "libswresample")]
        Library::Swresample => Some(unsafe { swresample::ffcap_header_version_swresample() }),
        #[cfg(feature = "libswscale")]
        Library::Swscale => Some(unsafe { swscale::ffcap_header_version_swscale() }),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_exist_only_for_enabled_libraries() {
        for lib in Library::ALL {
            assert_eq!(header_version(lib).is_some(), lib.is_enabled(), "{}", lib);
            assert_eq!(probed_version_int(lib).is_some(), lib.is_enabled(), "{}", lib);
        }
        assert_eq!(header_versions().len(), Capabilities::current().len());
    }

    #[test]
    fn test_generated_constants_match_preprocessor() {
        for (lib, version) in header_versions() {
            assert_eq!(probed_version_int(lib), Some(version.as_int()), "{}", lib);
        }
    }

    #[test]
    #[cfg(feature = "libavutil")]
    fn test_avutil_constants() {
        use avutil::*;

        assert!(LIBAVUTIL_VERSION_MAJOR >= 56);
        assert_eq!(
            LIBAVUTIL_VERSION_INT,
            LibraryVersion::new(
                LIBAVUTIL_VERSION_MAJOR,
                LIBAVUTIL_VERSION_MINOR,
                LIBAVUTIL_VERSION_MICRO
            )
            .as_int()
        );
        assert!(LIBAVUTIL_IDENT.starts_with("Lavu"));
    }

    #[test]
    #[cfg(all(feature = "libavutil", feature = "libswscale"))]
    fn test_avutil_and_swscale_surface() {
        assert!(header_version(Library::Avutil).is_some());
        assert!(header_version(Library::Swscale).is_some());
        assert_eq!(
            swscale::LIBSWSCALE_IDENT,
            swscale::LIBSWSCALE_VERSION.ident(Library::Swscale)
        );
    }

    #[test]
    fn test_repeated_aggregation_is_stable() {
        assert_eq!(header_versions(), header_versions());

        let current = Capabilities::current();
        let again: Capabilities = current.iter().chain(current.iter()).collect();
        assert_eq!(again, current);
        assert_eq!(current.union(current), current);

        for (lib, version) in header_versions() {
            assert_eq!(
                crate::header::render_version_module(lib, version),
                crate::header::render_version_module(lib, version)
            );
        }
    }

    #[test]
    #[cfg(feature = "api")]
    fn test_header_majors_are_supported() {
        for (lib, version) in header_versions() {
            assert_eq!(crate::header::check_supported(lib, version), Ok(()));
        }
    }
}
