//! Build script for ffmpeg-capability-sys
//!
//! Handles:
//! 1. Locating the FFmpeg installation for the enabled libraries
//! 2. Generating the version metadata modules from the version headers
//! 3. Setting `ffmpeg_*` cfgs for the API groups the headers declare, and
//!    rejecting header majors the `api` declarations were not written for
//! 4. Compiling the C probe through the aggregation headers via `cc`
//! 5. Linking the enabled FFmpeg libraries (dynamic, or static with `static`)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[allow(dead_code)]
#[path = "src/library.rs"]
mod library;

#[allow(dead_code)]
#[path = "src/header.rs"]
mod header;

use header::LibraryVersion;
use library::{Capabilities, Library};

/// Where the FFmpeg headers and libraries live
struct FfmpegInstall {
    include_dirs: Vec<PathBuf>,
    lib_dirs: Vec<PathBuf>,
    /// `-l` names pkg-config reported for a static link, in its order
    link_libs: Vec<String>,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/library.rs");
    println!("cargo:rerun-if-changed=src/header.rs");
    println!("cargo:rerun-if-changed=src/ffi/ffmpeg.h");
    println!("cargo:rerun-if-changed=src/ffi/ffmpeg_version.h");
    println!("cargo:rerun-if-changed=src/ffi/probe.c");
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");

    for cfg in header::API_CFGS.iter() {
        println!("cargo:rustc-check-cfg=cfg({})", cfg.name);
    }

    let enabled = Capabilities::current();
    if enabled.is_empty() {
        // Nothing selected: the crate compiles standalone with an empty surface
        return;
    }

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let install = find_ffmpeg(enabled, &target_os, &target_arch);

    for lib in Library::ALL {
        let version = read_version(lib, &install.include_dirs);
        if enabled.contains(lib) {
            let version = version.unwrap_or_else(|| {
                panic!(
                    "Feature `{}` is enabled but {} was not found in {:?}",
                    lib.feature(),
                    lib.version_headers()[1],
                    install.include_dirs
                )
            });
            if cfg!(feature = "api") {
                if let Err(e) = header::check_supported(lib, version) {
                    panic!("{}. Build against a supported FFmpeg or disable `api`.", e);
                }
            }
            write_version_module(lib, version, &out_dir);
        }

        // Shared types (channel layouts) follow libavutil even when only
        // libswresample is enabled
        if let Some(version) = version {
            for cfg in header::api_cfgs(lib, version) {
                println!("cargo:rustc-cfg={}", cfg);
            }
        }
    }

    // Compile the probe through the aggregation headers
    compile_probe(enabled, &install.include_dirs);

    // Link FFmpeg libraries
    if cfg!(feature = "api") {
        link_ffmpeg(enabled, &install, &target_os);
    }

    // Let dependent -sys crates find the same headers
    match env::join_paths(&install.include_dirs) {
        Ok(joined) => println!("cargo:include={}", joined.to_string_lossy()),
        Err(e) => println!("cargo:warning=Cannot publish include dirs: {}", e),
    }
}

/// Locate FFmpeg headers and libraries
fn find_ffmpeg(enabled: Capabilities, target_os: &str, target_arch: &str) -> FfmpegInstall {
    // Check for custom FFMPEG_DIR environment variable
    if let Ok(dir) = env::var("FFMPEG_DIR") {
        let prefix = PathBuf::from(dir);
        return FfmpegInstall::from_prefix(&prefix);
    }

    // Ask pkg-config for every enabled library
    if let Some(install) = probe_pkg_config(enabled, target_os) {
        return install;
    }

    // Try common installation paths
    if let Some(prefix) = find_common_prefix(enabled, target_os) {
        return FfmpegInstall::from_prefix(&prefix);
    }

    // Try bundled FFmpeg in project directory
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    let platform = match (target_os, target_arch) {
        ("macos", "aarch64") => "darwin-arm64",
        ("macos", "x86_64") => "darwin-x64",
        ("linux", "x86_64") => "linux-x64",
        ("linux", "aarch64") => "linux-arm64",
        ("windows", "x86_64") => "win32-x64",
        _ => "unknown",
    };

    let bundled = manifest_dir.join("ffmpeg").join(platform);
    if has_headers(&bundled.join("include"), enabled) {
        return FfmpegInstall::from_prefix(&bundled);
    }

    let missing: Vec<&str> = enabled.iter().map(Library::feature).collect();
    panic!(
        "FFmpeg not found for enabled libraries [{}]. \
          Set FFMPEG_DIR to an FFmpeg prefix, make the libraries visible to pkg-config, \
          or build one with tools/build-ffmpeg.",
        missing.join(", ")
    );
}

impl FfmpegInstall {
    fn from_prefix(prefix: &Path) -> Self {
        Self {
            include_dirs: vec![prefix.join("include")],
            lib_dirs: vec![prefix.join("lib")],
            link_libs: Vec::new(),
        }
    }
}

/// Installation prefixes searched when neither FFMPEG_DIR nor pkg-config
/// locate FFmpeg
fn common_prefixes(target_os: &str) -> &'static [&'static str] {
    match target_os {
        "macos" => &[
            "/opt/homebrew", // Apple Silicon Homebrew
            "/usr/local",    // Intel Homebrew / manual install
            "/opt/local",    // MacPorts
        ],
        "linux" => &["/usr", "/usr/local", "/opt/ffmpeg"],
        "windows" => &["C:\\ffmpeg", "C:\\Program Files\\ffmpeg"],
        _ => &[],
    }
}

/// First common prefix holding the headers of every enabled library
fn find_common_prefix(enabled: Capabilities, target_os: &str) -> Option<PathBuf> {
    common_prefixes(target_os)
        .iter()
        .map(PathBuf::from)
        .find(|prefix| has_headers(&prefix.join("include"), enabled))
}

/// Whether every enabled library's public header exists under `include`
fn has_headers(include: &Path, enabled: Capabilities) -> bool {
    enabled.iter().all(|lib| include.join(lib.header()).exists())
}

/// Collect include and link directories from pkg-config.
///
/// Returns `None` as soon as one enabled library is unknown to pkg-config.
fn probe_pkg_config(enabled: Capabilities, target_os: &str) -> Option<FfmpegInstall> {
    let mut install = FfmpegInstall {
        include_dirs: Vec::new(),
        lib_dirs: Vec::new(),
        link_libs: Vec::new(),
    };

    for lib in enabled.iter() {
        let found = pkg_config::Config::new()
            .cargo_metadata(false)
            .env_metadata(true)
            .statik(cfg!(feature = "static"))
            .probe(lib.pkg_config_name())
            .ok()?;

        for dir in found.include_paths {
            if !install.include_dirs.contains(&dir) {
                install.include_dirs.push(dir);
            }
        }
        for dir in found.link_paths {
            if !install.lib_dirs.contains(&dir) {
                install.lib_dirs.push(dir);
            }
        }
        for name in found.libs {
            if !install.link_libs.contains(&name) {
                install.link_libs.push(name);
            }
        }
    }

    // Headers installed straight into the default include path yield no -I,
    // but build.rs still has to read the version headers from disk
    if install.include_dirs.is_empty() {
        let prefix = find_common_prefix(enabled, target_os)?;
        install.include_dirs.push(prefix.join("include"));
    }

    Some(install)
}

/// Parse the version headers of `lib`, `None` when they are not installed
fn read_version(lib: Library, include_dirs: &[PathBuf]) -> Option<LibraryVersion> {
    let mut sources = Vec::new();
    for relative in lib.version_headers() {
        if let Some(path) = include_dirs
            .iter()
            .map(|dir| dir.join(relative))
            .find(|path| path.exists())
        {
            println!("cargo:rerun-if-changed={}", path.display());
            let text = fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
            sources.push(text);
        }
    }

    if sources.is_empty() {
        return None;
    }

    let borrowed: Vec<&str> = sources.iter().map(String::as_str).collect();
    let version = header::parse_version(&borrowed, lib)
        .unwrap_or_else(|e| panic!("Failed to read the {} version: {}", lib, e));
    Some(version)
}

/// Write `version_<lib>.rs` for the `version` module
fn write_version_module(lib: Library, version: LibraryVersion, out_dir: &Path) {
    let module = header::render_version_module(lib, version);
    let path = out_dir.join(format!("version_{}.rs", lib.name()));
    fs::write(&path, module).unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
}

/// Compile the C probe library.
///
/// This is where a missing header for an enabled library surfaces as a
/// compiler error.
fn compile_probe(enabled: Capabilities, include_dirs: &[PathBuf]) {
    let mut build = cc::Build::new();
    build
        .file("src/ffi/probe.c")
        .include("src/ffi")
        .includes(include_dirs)
        .warnings(true);

    for lib in enabled.iter() {
        build.define(lib.define(), None);
    }

    if cfg!(feature = "api") {
        build.define("FFCAP_FULL_API", None);
    }

    // Platform-specific flags
    #[cfg(target_os = "macos")]
    {
        build.flag("-Wno-deprecated-declarations");
    }

    build.compile("ffcap_probe");
}

/// Link the enabled FFmpeg libraries
fn link_ffmpeg(enabled: Capabilities, install: &FfmpegInstall, target_os: &str) {
    if cfg!(feature = "static") {
        link_static_ffmpeg(enabled, install);
        link_platform_libraries(target_os);
    } else {
        link_dynamic_ffmpeg(enabled, &install.lib_dirs);
    }
}

fn link_dynamic_ffmpeg(enabled: Capabilities, lib_dirs: &[PathBuf]) {
    for dir in lib_dirs {
        println!("cargo:rustc-link-search=native={}", dir.display());
    }
    for lib in enabled.link_order() {
        println!("cargo:rustc-link-lib=dylib={}", lib.name());
    }
}

/// Link FFmpeg statically using full paths to .a files.
///
/// Archives do not carry their dependencies, so the link set is the enabled
/// libraries, every library they depend on, and whatever FFmpeg library the
/// pkg-config static flags name. Third-party libraries from those flags
/// (codecs, zlib, hardware APIs) follow the archives.
fn link_static_ffmpeg(enabled: Capabilities, install: &FfmpegInstall) {
    let lib_dirs = &install.lib_dirs;
    let link_names = install.link_libs.iter().map(String::as_str);
    let linked = enabled
        .with_dependencies()
        .union(Capabilities::from_link_names(link_names));

    for lib in linked.link_order() {
        match find_static_lib_path(lib.name(), lib_dirs) {
            // Use link-arg to specify full path - this forces static linking
            Some(path) => println!("cargo:rustc-link-arg={}", path.display()),
            None => panic!(
                "Static library lib{}.a not found in {:?}. \
                  The `static` feature requires FFmpeg built with static libraries; \
                  set FFMPEG_DIR or build one with `tools/build-ffmpeg --static`.",
                lib.name(),
                lib_dirs
            ),
        }
    }

    for dir in lib_dirs {
        println!("cargo:rustc-link-search=native={}", dir.display());
    }
    for name in &install.link_libs {
        if name.parse::<Library>().is_err() {
            println!("cargo:rustc-link-lib={}", name);
        }
    }
}

/// Find static library path if it exists
fn find_static_lib_path(name: &str, paths: &[PathBuf]) -> Option<PathBuf> {
    let static_name = format!("lib{}.a", name);

    for path in paths {
        let full_path = path.join(&static_name);
        if full_path.exists() {
            return Some(full_path);
        }
    }
    None
}

/// Link platform-specific system libraries needed by static FFmpeg
fn link_platform_libraries(target_os: &str) {
    match target_os {
        "macos" => {
            let frameworks = [
                "VideoToolbox",
                "CoreMedia",
                "CoreVideo",
                "CoreFoundation",
                "Security",
                "AudioToolbox",
                "CoreServices",
            ];

            for framework in &frameworks {
                println!("cargo:rustc-link-lib=framework={}", framework);
            }

            println!("cargo:rustc-link-lib=bz2");
            println!("cargo:rustc-link-lib=iconv");
            println!("cargo:rustc-link-lib=lzma");
        }

        "linux" => {
            println!("cargo:rustc-link-lib=m");
            println!("cargo:rustc-link-lib=pthread");
            println!("cargo:rustc-link-lib=dl");
        }

        "windows" => {
            let libs = [
                "bcrypt", "ole32", "oleaut32", "user32", "ws2_32", "secur32", "advapi32",
            ];

            for lib in &libs {
                println!("cargo:rustc-link-lib={}", lib);
            }
        }

        _ => {
            println!("cargo:warning=Unknown target OS: {}", target_os);
        }
    }
}
