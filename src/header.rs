//! Version metadata read from FFmpeg's version headers
//!
//! Shared with `build.rs` through `#[path]`, so only `thiserror` (also a
//! build-dependency) may be used here besides std.

use std::fmt;

use super::library::Library;

/// `major.minor.micro` version of one FFmpeg library
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LibraryVersion {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl LibraryVersion {
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }

    /// Pack the same way as FFmpeg's `AV_VERSION_INT`
    pub const fn as_int(&self) -> u32 {
        (self.major << 16) | (self.minor << 8) | self.micro
    }

    /// Unpack a value produced by `AV_VERSION_INT` or `<lib>_version()`
    pub const fn from_int(value: u32) -> Self {
        Self {
            major: value >> 16,
            minor: (value >> 8) & 0xff,
            micro: value & 0xff,
        }
    }

    /// The `LIB*_IDENT` string FFmpeg builds for this version
    pub fn ident(&self, library: Library) -> String {
        format!("{}{}", library.ident_prefix(), self)
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Which component of the version triple
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    Major,
    Minor,
    Micro,
}

impl Component {
    const fn suffix(self) -> &'static str {
        match self {
            Component::Major => "VERSION_MAJOR",
            Component::Minor => "VERSION_MINOR",
            Component::Micro => "VERSION_MICRO",
        }
    }
}

/// Failure to extract a version from header text
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The define never appeared
    #[error("#define {define} not found")]
    Missing { define: String },
    /// The define appeared with a non-numeric value
    #[error("#define {define} has non-numeric value {value:?}")]
    NotANumber { define: String, value: String },
}

/// Headers of a major version the `api` declarations were not written for
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{library} {version} is not supported, expected major {low} through {high}")]
pub struct UnsupportedVersion {
    pub library: Library,
    pub version: LibraryVersion,
    pub low: u32,
    pub high: u32,
}

/// Reject header versions outside `Library::supported_majors`
pub fn check_supported(library: Library, version: LibraryVersion) -> Result<(), UnsupportedVersion> {
    let (low, high) = library.supported_majors();
    if (low..=high).contains(&version.major) {
        Ok(())
    } else {
        Err(UnsupportedVersion {
            library,
            version,
            low,
            high,
        })
    }
}

// ============================================================================
// Header Parsing
// ============================================================================

/// Name of the define holding one component, e.g. `LIBAVCODEC_VERSION_MAJOR`
pub fn define_name(library: Library, component: Component) -> String {
    format!("{}_{}", library.define(), component.suffix())
}

/// Find `#define <name> <value>` in header text.
///
/// Tolerates whitespace between `#` and `define` and trailing comments.
fn find_define<'a>(source: &'a str, name: &str) -> Option<&'a str> {
    source.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix('#')?;
        let rest = rest.trim_start().strip_prefix("define")?;
        let mut tokens = rest.split_whitespace();
        if tokens.next()? != name {
            return None;
        }
        tokens.next()
    })
}

fn parse_component(
    sources: &[&str],
    library: Library,
    component: Component,
) -> Result<u32, ParseError> {
    let define = define_name(library, component);
    let value = sources
        .iter()
        .find_map(|source| find_define(source, &define))
        .ok_or_else(|| ParseError::Missing {
            define: define.clone(),
        })?;
    value.parse().map_err(|_| ParseError::NotANumber {
        define,
        value: value.to_string(),
    })
}

/// Extract the version triple of `library` from the contents of its version
/// headers. The defines may be spread across several files.
pub fn parse_version(sources: &[&str], library: Library) -> Result<LibraryVersion, ParseError> {
    Ok(LibraryVersion {
        major: parse_component(sources, library, Component::Major)?,
        minor: parse_component(sources, library, Component::Minor)?,
        micro: parse_component(sources, library, Component::Micro)?,
    })
}

/// Render the Rust source of the `version::<lib>` module body
pub fn render_version_module(library: Library, version: LibraryVersion) -> String {
    let define = library.define();
    format!(
        "// Generated by build.rs from the {name} version headers.\n\
          \n\
          /// Major version of the {name} headers this crate was built against\n\
          pub const {define}_VERSION_MAJOR: u32 = {major};\n\
          /// Minor version of the {name} headers this crate was built against\n\
          pub const {define}_VERSION_MINOR: u32 = {minor};\n\
          /// Micro version of the {name} headers this crate was built against\n\
          pub const {define}_VERSION_MICRO: u32 = {micro};\n\
          /// `AV_VERSION_INT` of the {name} headers\n\
          pub const {define}_VERSION_INT: u32 = {int};\n\
          /// Library identification string\n\
          pub const {define}_IDENT: &str = \"{ident}\";\n\
          /// Header version as a structured value\n\
          pub const {define}_VERSION: crate::LibraryVersion = crate::LibraryVersion::new({major}, {minor}, {micro});\n",
        name = library.name(),
        define = define,
        major = version.major,
        minor = version.minor,
        micro = version.micro,
        int = version.as_int(),
        ident = version.ident(library),
    )
}

// ============================================================================
// API Levels
// ============================================================================

/// A `--cfg` flag build.rs sets when the installed headers of `library`
/// declare a group of functions that only exists in some releases
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiCfg {
    pub name: &'static str,
    pub library: Library,
    /// First version declaring the group
    pub since: LibraryVersion,
    /// First major that no longer declares it
    pub removed_in_major: Option<u32>,
}

impl ApiCfg {
    const fn new(
        name: &'static str,
        library: Library,
        since: LibraryVersion,
        removed_in_major: Option<u32>,
    ) -> Self {
        Self {
            name,
            library,
            since,
            removed_in_major,
        }
    }

    /// Whether headers at `version` declare this group
    pub fn applies_to(&self, version: LibraryVersion) -> bool {
        version >= self.since && self.removed_in_major.is_none_or(|major| version.major < major)
    }
}

const ANY: LibraryVersion = LibraryVersion::new(0, 0, 0);

/// Every version-dependent API group of the `api` declarations
pub static API_CFGS: [ApiCfg; 7] = [
    // AVChannelLayout and av_channel_layout_* (FFmpeg 5.1)
    ApiCfg::new(
        "ffmpeg_channel_layout",
        Library::Avutil,
        LibraryVersion::new(57, 24, 100),
        None,
    ),
    // uint64_t channel masks, av_get_default_channel_layout (gone in 7.0)
    ApiCfg::new("ffmpeg_channel_mask", Library::Avutil, ANY, Some(59)),
    ApiCfg::new(
        "ffmpeg_swr_alloc_set_opts2",
        Library::Swresample,
        LibraryVersion::new(4, 5, 100),
        None,
    ),
    ApiCfg::new("ffmpeg_swr_alloc_set_opts", Library::Swresample, ANY, Some(5)),
    ApiCfg::new(
        "ffmpeg_filter_pad_count",
        Library::Avfilter,
        LibraryVersion::new(8, 24, 100),
        None,
    ),
    ApiCfg::new(
        "ffmpeg_sws_scale_frame",
        Library::Swscale,
        LibraryVersion::new(6, 1, 100),
        None,
    ),
    // Packet side data sizes became size_t in FFmpeg 5.0
    ApiCfg::new(
        "ffmpeg_side_data_size_t",
        Library::Avcodec,
        LibraryVersion::new(59, 0, 100),
        None,
    ),
];

/// Names of the cfg flags that apply to `library` at `version`
pub fn api_cfgs(library: Library, version: LibraryVersion) -> impl Iterator<Item = &'static str> {
    API_CFGS
        .iter()
        .filter(move |cfg| cfg.library == library && cfg.applies_to(version))
        .map(|cfg| cfg.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVUTIL_4_4: &str = r#"
#ifndef AVUTIL_VERSION_H
#define AVUTIL_VERSION_H

#include "macros.h"

#define AV_VERSION_INT(a, b, c) ((a)<<16 | (b)<<8 | (c))

#define LIBAVUTIL_VERSION_MAJOR  56
#define LIBAVUTIL_VERSION_MINOR  70
#define LIBAVUTIL_VERSION_MICRO 100

#define LIBAVUTIL_VERSION_INT   AV_VERSION_INT(LIBAVUTIL_VERSION_MAJOR, \
                                                                                              LIBAVUTIL_VERSION_MINOR, \
                                                                                              LIBAVUTIL_VERSION_MICRO)
#endif /* AVUTIL_VERSION_H */
"#;

    const AVCODEC_6_0_MAJOR: &str = r#"
#ifndef AVCODEC_VERSION_MAJOR_H
#define AVCODEC_VERSION_MAJOR_H

#define LIBAVCODEC_VERSION_MAJOR  60

#define FF_API_INIT_PACKET         (LIBAVCODEC_VERSION_MAJOR < 61)
#endif
"#;

    const AVCODEC_6_0_VERSION: &str = r#"
#include "libavutil/version.h"
#include "version_major.h"

#define LIBAVCODEC_VERSION_MINOR   3
#define LIBAVCODEC_VERSION_MICRO 100

#define LIBAVCODEC_IDENT        "Lavc" AV_STRINGIFY(LIBAVCODEC_VERSION)
"#;

    #[test]
    fn test_parse_single_header_layout() {
        let version = parse_version(&[AVUTIL_4_4], Library::Avutil).unwrap();
        assert_eq!(version, LibraryVersion::new(56, 70, 100));
    }

    #[test]
    fn test_parse_split_header_layout() {
        let version =
            parse_version(&[AVCODEC_6_0_MAJOR, AVCODEC_6_0_VERSION], Library::Avcodec).unwrap();
        assert_eq!(version, LibraryVersion::new(60, 3, 100));

        let reversed =
            parse_version(&[AVCODEC_6_0_VERSION, AVCODEC_6_0_MAJOR], Library::Avcodec).unwrap();
        assert_eq!(version, reversed);
    }

    #[test]
    fn test_parse_ignores_other_libraries() {
        let err = parse_version(&[AVUTIL_4_4], Library::Avcodec).unwrap_err();
        assert_eq!(
            err,
            ParseError::Missing {
                define: "LIBAVCODEC_VERSION_MAJOR".to_string()
            }
        );
    }

    #[test]
    fn test_parse_missing_component() {
        let err = parse_version(&[AVCODEC_6_0_VERSION], Library::Avcodec).unwrap_err();
        assert!(err.to_string().contains("LIBAVCODEC_VERSION_MAJOR"));
    }

    #[test]
    fn test_parse_non_numeric_value() {
        let source = "#define LIBSWSCALE_VERSION_MAJOR FOO\n";
        let err = parse_version(&[source], Library::Swscale).unwrap_err();
        assert_eq!(
            err,
            ParseError::NotANumber {
                define: "LIBSWSCALE_VERSION_MAJOR".to_string(),
                value: "FOO".to_string()
            }
        );
    }

    #[test]
    fn test_parse_tolerates_spacing() {
        let source = "#  define LIBSWSCALE_VERSION_MAJOR\t7 /* major */\n\
                                    #define LIBSWSCALE_VERSION_MINOR 1\n\
                                    #define LIBSWSCALE_VERSION_MICRO 100\n";
        let version = parse_version(&[source], Library::Swscale).unwrap();
        assert_eq!(version, LibraryVersion::new(7, 1, 100));
    }

    #[test]
    fn test_version_int_packing() {
        let version = LibraryVersion::new(58, 134, 100);
        assert_eq!(version.as_int(), (58 << 16) | (134 << 8) | 100);
        assert_eq!(LibraryVersion::from_int(version.as_int()), version);
        assert!(LibraryVersion::new(60, 0, 0) > LibraryVersion::new(59, 255, 255));
    }

    #[test]
    fn test_ident_and_display() {
        let version = LibraryVersion::new(60, 3, 100);
        assert_eq!(version.to_string(), "60.3.100");
        assert_eq!(version.ident(Library::Avcodec), "Lavc60.3.100");
        assert_eq!(version.ident(Library::Swresample), "SwR60.3.100");
    }

    #[test]
    fn test_render_version_module() {
        let rendered = render_version_module(Library::Avutil, LibraryVersion::new(56, 70, 100));
        assert!(rendered.contains("pub const LIBAVUTIL_VERSION_MAJOR: u32 = 56;"));
        assert!(rendered.contains("pub const LIBAVUTIL_VERSION_MINOR: u32 = 70;"));
        assert!(rendered.contains("pub const LIBAVUTIL_VERSION_MICRO: u32 = 100;"));
        assert!(rendered.contains(&format!(
            "pub const LIBAVUTIL_VERSION_INT: u32 = {};",
            (56 << 16) | (70 << 8) | 100
        )));
        assert!(rendered.contains("pub const LIBAVUTIL_IDENT: &str = \"Lavu56.70.100\";"));
        assert!(!rendered.contains("LIBAVCODEC"));
    }

    fn cfgs(library: Library, major: u32, minor: u32) -> Vec<&'static str> {
        api_cfgs(library, LibraryVersion::new(major, minor, 100)).collect()
    }

    #[test]
    fn test_api_cfgs_for_ffmpeg_4_4() {
        assert_eq!(cfgs(Library::Avutil, 56, 70), vec!["ffmpeg_channel_mask"]);
        assert_eq!(cfgs(Library::Swresample, 3, 9), vec!["ffmpeg_swr_alloc_set_opts"]);
        assert!(cfgs(Library::Avfilter, 7, 110).is_empty());
        assert!(cfgs(Library::Swscale, 5, 9).is_empty());
        assert!(cfgs(Library::Avcodec, 58, 134).is_empty());
    }

    #[test]
    fn test_api_cfgs_for_ffmpeg_6_0() {
        assert_eq!(
            cfgs(Library::Avutil, 58, 2),
            vec!["ffmpeg_channel_layout", "ffmpeg_channel_mask"]
        );
        assert_eq!(
            cfgs(Library::Swresample, 4, 10),
            vec!["ffmpeg_swr_alloc_set_opts2", "ffmpeg_swr_alloc_set_opts"]
        );
        assert_eq!(cfgs(Library::Avfilter, 9, 3), vec!["ffmpeg_filter_pad_count"]);
        assert_eq!(cfgs(Library::Avcodec, 60, 3), vec!["ffmpeg_side_data_size_t"]);
    }

    #[test]
    fn test_api_cfgs_for_ffmpeg_7_1() {
        assert_eq!(cfgs(Library::Avutil, 59, 39), vec!["ffmpeg_channel_layout"]);
        assert_eq!(cfgs(Library::Swresample, 5, 3), vec!["ffmpeg_swr_alloc_set_opts2"]);
    }

    #[test]
    fn test_every_release_can_build_a_resampler() {
        // One of the two allocation paths is always declared
        for (avutil, swresample) in [((56, 70), (3, 9)), ((57, 28), (4, 7)), ((59, 39), (5, 3))] {
            let avutil = cfgs(Library::Avutil, avutil.0, avutil.1);
            let swresample = cfgs(Library::Swresample, swresample.0, swresample.1);
            let modern = avutil.contains(&"ffmpeg_channel_layout")
                && swresample.contains(&"ffmpeg_swr_alloc_set_opts2");
            let legacy = avutil.contains(&"ffmpeg_channel_mask")
                && swresample.contains(&"ffmpeg_swr_alloc_set_opts");
            assert!(modern || legacy);
        }
    }

    #[test]
    fn test_supported_versions() {
        assert!(check_supported(Library::Avutil, LibraryVersion::new(56, 70, 100)).is_ok());
        assert!(check_supported(Library::Avutil, LibraryVersion::new(60, 8, 100)).is_ok());

        let err = check_supported(Library::Avutil, LibraryVersion::new(55, 78, 100)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "avutil 55.78.100 is not supported, expected major 56 through 60"
        );
        assert!(check_supported(Library::Postproc, LibraryVersion::new(59, 0, 100)).is_err());
    }

    #[test]
    fn test_parse_error_messages() {
        let missing = ParseError::Missing {
            define: "LIBAVUTIL_VERSION_MAJOR".to_string(),
        };
        assert_eq!(missing.to_string(), "#define LIBAVUTIL_VERSION_MAJOR not found");
        let nan = ParseError::NotANumber {
            define: "LIBAVUTIL_VERSION_MINOR".to_string(),
            value: "X".to_string(),
        };
        assert_eq!(
            nan.to_string(),
            "#define LIBAVUTIL_VERSION_MINOR has non-numeric value \"X\""
        );
    }
}
