//! Runtime compatibility check
//!
//! Compares the version a linked library reports about itself against the
//! headers the declarations were written for. A different major version
//! means the ABI changed and none of the declarations can be trusted.

use crate::library::{Capabilities, Library};
use crate::version::header_version;
use crate::LibraryVersion;

/// Reasons a library cannot be used at runtime
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompatError {
    #[error("{0} is not enabled in this build")]
    NotEnabled(Library),

    #[error("{library} major version mismatch: headers {header}, runtime {runtime}")]
    MajorMismatch {
        library: Library,
        header: LibraryVersion,
        runtime: LibraryVersion,
    },
}

/// Version reported by the linked library, `None` when it was not enabled
pub fn runtime_version(library: Library) -> Option<LibraryVersion> {
    let raw: Option<std::os::raw::c_uint> = match library {
        #[cfg(feature = "libavcodec")]
        Library::Avcodec => Some(unsafe { super::avcodec::avcodec_version() }),
        #[cfg(feature = "libavdevice")]
        Library::Avdevice => Some(unsafe { super::avdevice::avdevice_version() }),
        #[cfg(feature = "libavfilter")]
        Library::Avfilter => Some(unsafe { super::avfilter::avfilter_version() }),
        #[cfg(feature = "libavformat")]
        Library::Avformat => Some(unsafe { super::avformat::avformat_version() }),
        #[cfg(feature = "libavutil")]
        Library::Avutil => Some(unsafe { super::avutil::avutil_version() }),
        #[cfg(feature = "libpostproc")]
        Library::Postproc => Some(unsafe { super::postproc::postproc_version() }),
        #[cfg(feature = "libswresample")]
        Library::Swresample => Some(unsafe { super::swresample::swresample_version() }),
        #[cfg(feature = "libswscale")]
        Library::Swscale => Some(unsafe { super::swscale::swscale_version() }),
        #[allow(unreachable_patterns)]
        _ => None,
    };
    raw.map(LibraryVersion::from_int)
}

/// Decide whether a runtime version can serve code built against `header`
pub fn compare(
    library: Library,
    header: LibraryVersion,
    runtime: LibraryVersion,
) -> Result<LibraryVersion, CompatError> {
    if header.major != runtime.major {
        return Err(CompatError::MajorMismatch {
            library,
            header,
            runtime,
        });
    }
    if runtime.minor < header.minor {
        tracing::warn!(
            target: "ffmpeg_capability_sys",
            "{} runtime {} is older than headers {}, newer symbols may be missing",
            library,
            runtime,
            header
        );
    } else {
        tracing::debug!(
            target: "ffmpeg_capability_sys",
            "{} runtime {} (headers {})",
            library,
            runtime,
            header
        );
    }
    Ok(runtime)
}

/// Check one enabled library, returning its runtime version
pub fn check(library: Library) -> Result<LibraryVersion, CompatError> {
    match (header_version(library), runtime_version(library)) {
        (Some(header), Some(runtime)) => compare(library, header, runtime),
        _ => Err(CompatError::NotEnabled(library)),
    }
}

/// Check every enabled library, stopping at the first incompatible one
pub fn check_all() -> Result<Vec<(Library, LibraryVersion)>, CompatError> {
    Capabilities::current()
        .iter()
        .map(|library| check(library).map(|runtime| (library, runtime)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_major_mismatch() {
        init_tracing();
        let header = LibraryVersion::new(60, 3, 100);
        let runtime = LibraryVersion::new(59, 37, 100);
        assert_eq!(
            compare(Library::Avcodec, header, runtime),
            Err(CompatError::MajorMismatch {
                library: Library::Avcodec,
                header,
                runtime,
            })
        );
    }

    #[test]
    fn test_older_minor_is_allowed() {
        init_tracing();
        let header = LibraryVersion::new(58, 2, 100);
        let runtime = LibraryVersion::new(58, 1, 100);
        assert_eq!(compare(Library::Avutil, header, runtime), Ok(runtime));
        assert_eq!(
            compare(Library::Avutil, header, LibraryVersion::new(58, 29, 100)),
            Ok(LibraryVersion::new(58, 29, 100))
        );
    }

    #[test]
    fn test_error_messages() {
        let err = CompatError::MajorMismatch {
            library: Library::Swscale,
            header: LibraryVersion::new(7, 1, 100),
            runtime: LibraryVersion::new(6, 7, 100),
        };
        assert_eq!(
            err.to_string(),
            "swscale major version mismatch: headers 7.1.100, runtime 6.7.100"
        );
        assert_eq!(
            CompatError::NotEnabled(Library::Postproc).to_string(),
            "postproc is not enabled in this build"
        );
    }

    #[test]
    fn test_disabled_libraries_are_rejected() {
        for library in Library::ALL {
            if !library.is_enabled() {
                assert_eq!(check(library), Err(CompatError::NotEnabled(library)));
                assert!(runtime_version(library).is_none());
            }
        }
    }

    #[test]
    fn test_linked_libraries_match_headers() {
        init_tracing();
        let checked = check_all().unwrap();
        let libraries: Vec<Library> = checked.iter().map(|(library, _)| *library).collect();
        assert_eq!(libraries, Capabilities::current().iter().collect::<Vec<_>>());
        for (library, runtime) in checked {
            assert_eq!(
                Some(runtime.major),
                header_version(library).map(|v| v.major)
            );
        }
    }
}
