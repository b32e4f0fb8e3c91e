//! The FFmpeg library table and the capability set built from cargo features
//!
//! This file is shared with `build.rs` and `tools/build-ffmpeg` through
//! `#[path]`, so it must stay free of crate-internal paths. Every package
//! that includes it depends on `thiserror`.

use std::fmt;
use std::str::FromStr;

/// One of the FFmpeg component libraries this crate can expose
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Library {
    Avcodec,
    Avdevice,
    Avfilter,
    Avformat,
    Avutil,
    Postproc,
    Swresample,
    Swscale,
}

impl Library {
    /// Every library, in feature-flag order
    pub const ALL: [Library; 8] = [
        Library::Avcodec,
        Library::Avdevice,
        Library::Avfilter,
        Library::Avformat,
        Library::Avutil,
        Library::Postproc,
        Library::Swresample,
        Library::Swscale,
    ];

    /// Every library, dependents before their dependencies.
    ///
    /// Static archives must be handed to the linker in this order.
    pub const LINK_ORDER: [Library; 8] = [
        Library::Avdevice,
        Library::Avfilter,
        Library::Avformat,
        Library::Avcodec,
        Library::Postproc,
        Library::Swresample,
        Library::Swscale,
        Library::Avutil,
    ];

    /// Short name, as used for `-l<name>` and `--enable-<name>`
    pub const fn name(self) -> &'static str {
        match self {
            Library::Avcodec => "avcodec",
            Library::Avdevice => "avdevice",
            Library::Avfilter => "avfilter",
            Library::Avformat => "avformat",
            Library::Avutil => "avutil",
            Library::Postproc => "postproc",
            Library::Swresample => "swresample",
            Library::Swscale => "swscale",
        }
    }

    /// Cargo feature that enables this library
    pub const fn feature(self) -> &'static str {
        match self {
            Library::Avcodec => "libavcodec",
            Library::Avdevice => "libavdevice",
            Library::Avfilter => "libavfilter",
            Library::Avformat => "libavformat",
            Library::Avutil => "libavutil",
            Library::Postproc => "libpostproc",
            Library::Swresample => "libswresample",
            Library::Swscale => "libswscale",
        }
    }

    /// Preprocessor define consumed by the aggregation headers
    pub const fn define(self) -> &'static str {
        match self {
            Library::Avcodec => "LIBAVCODEC",
            Library::Avdevice => "LIBAVDEVICE",
            Library::Avfilter => "LIBAVFILTER",
            Library::Avformat => "LIBAVFORMAT",
            Library::Avutil => "LIBAVUTIL",
            Library::Postproc => "LIBPOSTPROC",
            Library::Swresample => "LIBSWRESAMPLE",
            Library::Swscale => "LIBSWSCALE",
        }
    }

    /// Public header, relative to the include root
    pub const fn header(self) -> &'static str {
        match self {
            Library::Avcodec => "libavcodec/avcodec.h",
            Library::Avdevice => "libavdevice/avdevice.h",
            Library::Avfilter => "libavfilter/avfilter.h",
            Library::Avformat => "libavformat/avformat.h",
            Library::Avutil => "libavutil/avutil.h",
            Library::Postproc => "libpostproc/postprocess.h",
            Library::Swresample => "libswresample/swresample.h",
            Library::Swscale => "libswscale/swscale.h",
        }
    }

    /// Headers carrying the version defines, relative to the include root.
    ///
    /// FFmpeg 5.1 moved the major version into `version_major.h` for most
    /// libraries; older releases only ship `version.h`.
    pub const fn version_headers(self) -> [&'static str; 2] {
        match self {
            Library::Avcodec => ["libavcodec/version_major.h", "libavcodec/version.h"],
            Library::Avdevice => ["libavdevice/version_major.h", "libavdevice/version.h"],
            Library::Avfilter => ["libavfilter/version_major.h", "libavfilter/version.h"],
            Library::Avformat => ["libavformat/version_major.h", "libavformat/version.h"],
            Library::Avutil => ["libavutil/version_major.h", "libavutil/version.h"],
            Library::Postproc => ["libpostproc/version_major.h", "libpostproc/version.h"],
            Library::Swresample => ["libswresample/version_major.h", "libswresample/version.h"],
            Library::Swscale => ["libswscale/version_major.h", "libswscale/version.h"],
        }
    }

    /// Prefix of the `LIB*_IDENT` string (e.g. "Lavc60.3.100")
    pub const fn ident_prefix(self) -> &'static str {
        match self {
            Library::Avcodec => "Lavc",
            Library::Avdevice => "Lavd",
            Library::Avfilter => "Lavfi",
            Library::Avformat => "Lavf",
            Library::Avutil => "Lavu",
            Library::Postproc => "postproc",
            Library::Swresample => "SwR",
            Library::Swscale => "SwS",
        }
    }

    /// pkg-config module name
    pub const fn pkg_config_name(self) -> &'static str {
        match self {
            Library::Avcodec => "libavcodec",
            Library::Avdevice => "libavdevice",
            Library::Avfilter => "libavfilter",
            Library::Avformat => "libavformat",
            Library::Avutil => "libavutil",
            Library::Postproc => "libpostproc",
            Library::Swresample => "libswresample",
            Library::Swscale => "libswscale",
        }
    }

    /// Libraries this one calls into, following FFmpeg's `configure`
    /// (`<lib>_deps`). Static archives need them on the same link line and
    /// `configure` refuses to build a library whose dependencies are off.
    pub const fn dependencies(self) -> &'static [Library] {
        match self {
            Library::Avcodec => &[Library::Avutil],
            Library::Avdevice => &[Library::Avformat, Library::Avcodec, Library::Avutil],
            Library::Avfilter => &[Library::Avutil],
            Library::Avformat => &[Library::Avcodec, Library::Avutil],
            Library::Avutil => &[],
            Library::Postproc => &[Library::Avutil],
            Library::Swresample => &[Library::Avutil],
            Library::Swscale => &[Library::Avutil],
        }
    }

    /// Header major versions the declarations under `api` are written for.
    ///
    /// Spans FFmpeg 4.4 through 8.0 (libpostproc was dropped in 8.0).
    pub const fn supported_majors(self) -> (u32, u32) {
        match self {
            Library::Avcodec => (58, 62),
            Library::Avdevice => (58, 62),
            Library::Avfilter => (7, 11),
            Library::Avformat => (58, 62),
            Library::Avutil => (56, 60),
            Library::Postproc => (55, 58),
            Library::Swresample => (3, 6),
            Library::Swscale => (5, 9),
        }
    }

    /// Whether the crate was compiled with this library's feature
    pub const fn is_enabled(self) -> bool {
        Capabilities::current().contains(self)
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no known library
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown FFmpeg library: {0}")]
pub struct UnknownLibrary(pub String);

impl FromStr for Library {
    type Err = UnknownLibrary;

    /// Accepts the short name ("avcodec"), the feature ("libavcodec") or the
    /// define ("LIBAVCODEC")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        let short = lower.strip_prefix("lib").unwrap_or(&lower);
        Library::ALL
            .into_iter()
            .find(|lib| lib.name() == short)
            .ok_or_else(|| UnknownLibrary(trimmed.to_string()))
    }
}

// ============================================================================
// Capability Set
// ============================================================================

/// Set of enabled libraries
///
/// Each library is one independent bit: no library implies or excludes
/// another, and inserting twice is the same as inserting once.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities {
    bits: u8,
}

impl Capabilities {
    /// The empty set
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Every library
    pub const fn all() -> Self {
        Self { bits: u8::MAX }
    }

    /// The set selected by this build's cargo features
    pub const fn current() -> Self {
        let mut caps = Self::empty();
        if cfg!(feature = "libavcodec") {
            caps = caps.with(Library::Avcodec);
        }
        if cfg!(feature = "libavdevice") {
            caps = caps.with(Library::Avdevice);
        }
        if cfg!(feature = "libavfilter") {
            caps = caps.with(Library::Avfilter);
        }
        if cfg!(feature = "libavformat") {
            caps = caps.with(Library::Avformat);
        }
        if cfg!(feature = "libavutil") {
            caps = caps.with(Library::Avutil);
        }
        if cfg!(feature = "libpostproc") {
            caps = caps.with(Library::Postproc);
        }
        if cfg!(feature = "libswresample") {
            caps = caps.with(Library::Swresample);
        }
        if cfg!(feature = "libswscale") {
            caps = caps.with(Library::Swscale);
        }
        caps
    }

    /// Return a copy with `library` added
    pub const fn with(self, library: Library) -> Self {
        Self {
            bits: self.bits | library.bit(),
        }
    }

    /// Return a copy with `library` removed
    pub const fn without(self, library: Library) -> Self {
        Self {
            bits: self.bits & !library.bit(),
        }
    }

    pub fn insert(&mut self, library: Library) {
        *self = self.with(library);
    }

    pub const fn contains(self, library: Library) -> bool {
        self.bits & library.bit() != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// This set plus everything its members depend on
    pub fn with_dependencies(self) -> Self {
        self.iter().fold(self, |caps, lib| {
            lib.dependencies()
                .iter()
                .fold(caps, |caps, dep| caps.with(*dep))
        })
    }

    /// FFmpeg libraries named in a linker library list (`-l` names as
    /// reported by pkg-config). Other names are ignored.
    pub fn from_link_names<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        names
            .into_iter()
            .filter_map(|name| name.parse::<Library>().ok())
            .collect()
    }

    /// Enabled libraries in feature-flag order
    pub fn iter(self) -> impl Iterator<Item = Library> {
        Library::ALL.into_iter().filter(move |lib| self.contains(*lib))
    }

    /// Enabled libraries in linker order
    pub fn link_order(self) -> impl Iterator<Item = Library> {
        Library::LINK_ORDER
            .into_iter()
            .filter(move |lib| self.contains(*lib))
    }
}

impl FromIterator<Library> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Library>>(iter: I) -> Self {
        iter
            .into_iter()
            .fold(Capabilities::empty(), |caps, lib| caps.with(lib))
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_consistent() {
        for lib in Library::ALL {
            assert_eq!(lib.feature(), format!("lib{}", lib.name()));
            assert_eq!(lib.define(), lib.feature().to_ascii_uppercase());
            assert_eq!(lib.pkg_config_name(), lib.feature());
            assert!(lib.header().starts_with(lib.feature()));
            for header in lib.version_headers() {
                assert!(header.starts_with(lib.feature()));
            }
        }
    }

    #[test]
    fn test_link_order_is_a_permutation() {
        let all: HashSet<_> = Library::ALL.into_iter().collect();
        let linked: HashSet<_> = Library::LINK_ORDER.into_iter().collect();
        assert_eq!(all, linked);
        assert_eq!(Library::LINK_ORDER.last(), Some(&Library::Avutil));
    }

    #[test]
    fn test_parse_library_names() {
        assert_eq!("avcodec".parse::<Library>(), Ok(Library::Avcodec));
        assert_eq!("libswscale".parse::<Library>(), Ok(Library::Swscale));
        assert_eq!("LIBPOSTPROC".parse::<Library>(), Ok(Library::Postproc));
        assert_eq!(" swresample ".parse::<Library>(), Ok(Library::Swresample));
        assert!("avresample".parse::<Library>().is_err());
        assert!("".parse::<Library>().is_err());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut once = Capabilities::empty();
        once.insert(Library::Avutil);

        let mut twice = Capabilities::empty();
        twice.insert(Library::Avutil);
        twice.insert(Library::Avutil);

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_flags_are_orthogonal() {
        for lib in Library::ALL {
            let caps = Capabilities::empty().with(lib);
            for other in Library::ALL {
                assert_eq!(caps.contains(other), lib == other);
            }
            assert_eq!(Capabilities::all().without(lib).len(), 7);
        }
    }

    #[test]
    fn test_union_is_order_independent() {
        let a: Capabilities = [Library::Avutil, Library::Swscale].into_iter().collect();
        let b: Capabilities = [Library::Avcodec].into_iter().collect();
        assert_eq!(a.union(b), b.union(a));

        let forward: Capabilities = Library::ALL.into_iter().collect();
        let backward: Capabilities = Library::ALL.into_iter().rev().collect();
        assert_eq!(forward, backward);
        assert_eq!(forward, Capabilities::all());
    }

    #[test]
    fn test_iteration_orders() {
        let caps: Capabilities = [Library::Avutil, Library::Avcodec, Library::Avformat]
            .into_iter()
            .collect();
        let features: Vec<_> = caps.iter().collect();
        assert_eq!(
            features,
            vec![Library::Avcodec, Library::Avformat, Library::Avutil]
        );
        let linked: Vec<_> = caps.link_order().collect();
        assert_eq!(
            linked,
            vec![Library::Avformat, Library::Avcodec, Library::Avutil]
        );
    }

    #[test]
    fn test_dependency_closure() {
        let swscale = Capabilities::empty().with(Library::Swscale);
        assert_eq!(
            swscale.with_dependencies(),
            swscale.with(Library::Avutil)
        );

        let avdevice = Capabilities::empty().with(Library::Avdevice);
        assert_eq!(
            avdevice.with_dependencies().link_order().collect::<Vec<_>>(),
            vec![
                Library::Avdevice,
                Library::Avformat,
                Library::Avcodec,
                Library::Avutil
            ]
        );

        // Closed under its own dependencies, so a second pass changes nothing
        for lib in Library::ALL {
            let closure = Capabilities::empty().with(lib).with_dependencies();
            assert_eq!(closure.with_dependencies(), closure);
        }
        assert!(Capabilities::empty().with_dependencies().is_empty());
    }

    #[test]
    fn test_dependencies_come_later_in_link_order() {
        let position = |lib: Library| Library::LINK_ORDER.iter().position(|l| *l == lib);
        for lib in Library::ALL {
            for dep in lib.dependencies() {
                assert!(position(lib) < position(*dep), "{} before {}", lib, dep);
            }
        }
    }

    #[test]
    fn test_from_link_names() {
        let caps = Capabilities::from_link_names(["avformat", "m", "avcodec", "z", "x264", "avutil"]);
        assert_eq!(
            caps,
            Capabilities::empty()
                .with(Library::Avformat)
                .with(Library::Avcodec)
                .with(Library::Avutil)
        );
    }

    #[test]
    fn test_supported_majors_are_ranges() {
        for lib in Library::ALL {
            let (low, high) = lib.supported_majors();
            assert!(low <= high, "{}", lib);
        }
    }

    #[test]
    fn test_unknown_library_message() {
        let err = "avresample".parse::<Library>().unwrap_err();
        assert_eq!(err.to_string(), "unknown FFmpeg library: avresample");
    }

    #[test]
    fn test_current_matches_features() {
        let current = Capabilities::current();
        assert_eq!(current.contains(Library::Avcodec), cfg!(feature = "libavcodec"));
        assert_eq!(current.contains(Library::Avdevice), cfg!(feature = "libavdevice"));
        assert_eq!(current.contains(Library::Avfilter), cfg!(feature = "libavfilter"));
        assert_eq!(current.contains(Library::Avformat), cfg!(feature = "libavformat"));
        assert_eq!(current.contains(Library::Avutil), cfg!(feature = "libavutil"));
        assert_eq!(current.contains(Library::Postproc), cfg!(feature = "libpostproc"));
        assert_eq!(
            current.contains(Library::Swresample),
            cfg!(feature = "libswresample")
        );
        assert_eq!(current.contains(Library::Swscale), cfg!(feature = "libswscale"));
        for lib in Library::ALL {
            assert_eq!(lib.is_enabled(), current.contains(lib));
        }
    }

    #[test]
    #[cfg(not(any(
        feature = "libavcodec",
        feature = "libavdevice",
        feature = "libavfilter",
        feature = "libavformat",
        feature = "libavutil",
        feature = "libpostproc",
        feature = "libswresample",
        feature = "libswscale"
    )))]
    fn test_no_features_means_empty_surface() {
        assert!(Capabilities::current().is_empty());
        assert_eq!(Capabilities::current().iter().count(), 0);
    }

    #[test]
    fn test_debug_lists_libraries() {
        let caps: Capabilities = [Library::Swscale, Library::Avutil].into_iter().collect();
        assert_eq!(format!("{:?}", caps), "{Avutil, Swscale}");
    }
}
