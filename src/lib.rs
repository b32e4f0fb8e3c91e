#![deny(clippy::all)]
#![allow(non_snake_case, non_camel_case_types, non_upper_case_globals)]
#![doc(test(attr(deny(warnings))))]

//! Feature-gated FFmpeg declarations
//!
//! Each FFmpeg library is behind its own cargo feature (`libavcodec`,
//! `libavdevice`, `libavfilter`, `libavformat`, `libavutil`, `libpostproc`,
//! `libswresample`, `libswscale`). The crate exposes exactly the surface of
//! the selected libraries and nothing of the others.
//!
//! Two surfaces are available:
//! - [`version`]: the header version constants of each enabled library.
//!   Always present, never links anything from FFmpeg.
//! - `api` (feature `api`, on by default): the full declarations of each
//!   enabled library, plus linking against it.
//!
//! ```toml
//! [dependencies]
//! ffmpeg-capability-sys = { version = "0.1", default-features = false, features = ["libavutil"] }
//! ```
//!
//! The `api` path only exists with the `api` feature:
//!
#![cfg_attr(feature = "api", doc = "```no_run")]
#![cfg_attr(not(feature = "api"), doc = "```compile_fail")]
//! let check = ffmpeg_capability_sys::api::compat::check_all;
//! # let _ = check;
//! ```

// Library selection and capability sets
pub mod library;

// Version header parsing (shared with build.rs)
pub mod header;

// Version metadata surface
pub mod version;

// Full API surface
#[cfg(feature = "api")]
pub mod api;

pub use header::LibraryVersion;
pub use library::{Capabilities, Library};

// Static FFmpeg builds need zlib from the same link line
#[cfg(feature = "static")]
extern crate libz_sys as _;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_root_reexports() {
        let current = Capabilities::current();
        for lib in Library::ALL {
            assert_eq!(current.contains(lib), lib.is_enabled());
        }
        assert_eq!(LibraryVersion::new(1, 2, 3).to_string(), "1.2.3");
    }
}
