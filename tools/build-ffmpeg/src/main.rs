//! FFmpeg provisioning tool
//!
//! Builds FFmpeg from source with exactly the selected component libraries
//! enabled, and prints the `FFMPEG_DIR` and cargo feature list to use with
//! ffmpeg-capability-sys.
//! Usage: cargo run --release --manifest-path tools/build-ffmpeg/Cargo.toml -- [OPTIONS]

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[allow(dead_code, unexpected_cfgs)]
#[path = "../../../src/library.rs"]
mod library;

use library::{Capabilities, Library};

const FFMPEG_VERSION: &str = "n7.1";
const FFMPEG_REPO: &str = "https://github.com/FFmpeg/FFmpeg.git";

/// Build context containing all configuration
struct BuildContext {
  /// Installation prefix
  prefix: PathBuf,
  /// Directory for source code
  source_dir: PathBuf,
  /// Number of parallel build jobs
  jobs: usize,
  /// Libraries to enable, everything else is disabled
  libs: Capabilities,
  /// Build static archives instead of shared objects
  static_libs: bool,
  /// Git tag to check out
  ffmpeg_version: String,
  /// Enable verbose output
  verbose: bool,
}

impl BuildContext {
  /// Log a message if verbose mode is enabled
  fn log(&self, msg: &str) {
    if self.verbose {
      println!("[build-ffmpeg] {}", msg);
    }
  }

  /// Log a message always
  fn info(&self, msg: &str) {
    println!("[build-ffmpeg] {}", msg);
  }

  /// Run a command, hiding its output unless verbose
  fn run_command(&self, cmd: &mut Command) -> io::Result<()> {
    self.log(&format!("Running: {:?}", cmd));

    let status = if self.verbose {
      cmd.status()?
    } else {
      cmd.stdout(Stdio::null()).stderr(Stdio::null()).status()?
    };

    if status.success() {
      Ok(())
    } else {
      Err(io::Error::other(format!(
        "Command failed with status: {}",
        status
      )))
    }
  }

  /// Run a command with visible output (always show)
  fn run_command_visible(&self, cmd: &mut Command) -> io::Result<()> {
    self.log(&format!("Running: {:?}", cmd));
    let status = cmd.status()?;
    if status.success() {
      Ok(())
    } else {
      Err(io::Error::other(format!(
        "Command failed with status: {}",
        status
      )))
    }
  }

  /// Shallow clone of a single tag
  fn git_clone(&self, url: &str, tag: &str, dest: &Path) -> io::Result<()> {
    if dest.exists() {
      self.log(&format!("Source already exists: {}", dest.display()));
      return Ok(());
    }

    let mut cmd = Command::new("git");
    cmd.args(["clone", "--depth=1", "-b", tag]).arg(url).arg(dest);
    self.run_command_visible(&mut cmd)
  }

  /// Arguments passed to FFmpeg's configure script
  fn configure_args(&self) -> Vec<String> {
    let mut args = vec![
      format!("--prefix={}", self.prefix.display()),
      "--enable-pic".to_string(),
      "--disable-programs".to_string(),
      "--disable-doc".to_string(),
    ];

    if self.static_libs {
      args.push("--enable-static".to_string());
      args.push("--disable-shared".to_string());
      args.push("--pkg-config-flags=--static".to_string());
    } else {
      args.push("--enable-shared".to_string());
      args.push("--disable-static".to_string());
    }

    // postproc only builds in GPL configurations
    if self.libs.contains(Library::Postproc) {
      args.push("--enable-gpl".to_string());
    }

    // configure refuses a library whose dependencies are disabled
    args.extend(configure_library_flags(self.libs.with_dependencies()));
    args
  }

  fn build_ffmpeg(&self) -> io::Result<()> {
    self.info(&format!("Building FFmpeg {}...", self.ffmpeg_version));

    let source = self.source_dir.join("FFmpeg");
    self.git_clone(FFMPEG_REPO, &self.ffmpeg_version, &source)?;

    let mut cmd = Command::new("./configure");
    cmd.args(self.configure_args()).current_dir(&source);
    self.run_command_visible(&mut cmd)?;

    let mut cmd = Command::new("make");
    cmd.arg(format!("-j{}", self.jobs)).current_dir(&source);
    self.run_command_visible(&mut cmd)?;

    let mut cmd = Command::new("make");
    cmd.arg("install").current_dir(&source);
    self.run_command(&mut cmd)
  }

  /// Check prerequisites
  fn check_prerequisites(&self) -> io::Result<()> {
    for tool in ["git", "make", "nasm"] {
      if Command::new("which")
        .arg(tool)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?
        .success()
      {
        self.log(&format!("Found: {}", tool));
      } else if tool == "nasm" {
        self.info(&format!(
          "Warning: {} not found, some optimizations may be disabled",
          tool
        ));
      } else {
        return Err(io::Error::new(
          io::ErrorKind::NotFound,
          format!("Required tool '{}' not found", tool),
        ));
      }
    }

    Ok(())
  }

  fn build_all(&mut self) -> io::Result<()> {
    fs::create_dir_all(&self.prefix)?;
    fs::create_dir_all(&self.source_dir)?;

    // Clean absolute paths for the .pc files
    self.prefix = self.prefix.canonicalize()?;
    self.source_dir = self.source_dir.canonicalize()?;

    self.check_prerequisites()?;
    self.build_ffmpeg()
  }
}

/// `--enable-<lib>` for selected libraries and `--disable-<lib>` for the rest
fn configure_library_flags(libs: Capabilities) -> Vec<String> {
  Library::ALL
    .into_iter()
    .map(|lib| {
      let action = if libs.contains(lib) { "enable" } else { "disable" };
      format!("--{}-{}", action, lib.name())
    })
    .collect()
}

/// Comma-separated cargo feature list matching a library selection
fn cargo_features(libs: Capabilities, static_libs: bool) -> String {
  let mut features: Vec<&str> = libs.iter().map(Library::feature).collect();
  if static_libs {
    features.push("static");
  }
  features.join(",")
}

/// Parse a `--libs` value such as "avutil,swscale" or "libavcodec"
fn parse_libs(value: &str) -> Result<Capabilities, String> {
  let libs = value
    .split(',')
    .filter(|name| !name.trim().is_empty())
    .map(|name| name.parse::<Library>().map_err(|e| e.to_string()))
    .collect::<Result<Capabilities, String>>()?;
  if libs.is_empty() {
    return Err("--libs needs at least one library".to_string());
  }
  Ok(libs)
}

/// Print usage information
fn print_usage() {
  eprintln!(
    r#"build-ffmpeg - Build FFmpeg with a chosen set of component libraries

USAGE:
    build-ffmpeg [OPTIONS]

OPTIONS:
    -o, --output <DIR>          Output installation directory [default: ./ffmpeg-build]
    -s, --source-dir <DIR>      Directory for source code [default: ./ffmpeg-src]
    -j, --jobs <N>              Parallel build jobs [default: num_cpus]
    --libs <LIST>               Comma-separated libraries to enable [default: all]
                                avcodec, avdevice, avfilter, avformat, avutil,
                                postproc, swresample, swscale
    --static                    Build static archives instead of shared libraries
    --ffmpeg-version <TAG>      FFmpeg git tag [default: {version}]
    -v, --verbose               Enable verbose output
    -h, --help                  Show this help message

EXAMPLE:
    cargo run --release -- --libs avutil,swscale -o ./ffmpeg
"#,
    version = FFMPEG_VERSION
  );
}

/// Parse command line arguments
fn parse_args(args: &[String]) -> Result<BuildContext, String> {
  let mut output = PathBuf::from("./ffmpeg-build");
  let mut source_dir = PathBuf::from("./ffmpeg-src");
  let mut jobs = num_cpus::get();
  let mut libs = Capabilities::all();
  let mut static_libs = false;
  let mut ffmpeg_version = FFMPEG_VERSION.to_string();
  let mut verbose = false;

  let mut i = 1;
  while i < args.len() {
    match args[i].as_str() {
      "-o" | "--output" => {
        i += 1;
        if i >= args.len() {
          return Err("Missing argument for --output".to_string());
        }
        output = PathBuf::from(&args[i]);
      }
      "-s" | "--source-dir" => {
        i += 1;
        if i >= args.len() {
          return Err("Missing argument for --source-dir".to_string());
        }
        source_dir = PathBuf::from(&args[i]);
      }
      "-j" | "--jobs" => {
        i += 1;
        if i >= args.len() {
          return Err("Missing argument for --jobs".to_string());
        }
        jobs = args[i]
          .parse()
          .map_err(|_| "Invalid number for --jobs".to_string())?;
      }
      "--libs" => {
        i += 1;
        if i >= args.len() {
          return Err("Missing argument for --libs".to_string());
        }
        libs = parse_libs(&args[i])?;
      }
      "--static" => {
        static_libs = true;
      }
      "--ffmpeg-version" => {
        i += 1;
        if i >= args.len() {
          return Err("Missing argument for --ffmpeg-version".to_string());
        }
        ffmpeg_version = args[i].clone();
      }
      "-v" | "--verbose" => {
        verbose = true;
      }
      "-h" | "--help" => {
        print_usage();
        std::process::exit(0);
      }
      arg => {
        return Err(format!("Unknown argument: {}", arg));
      }
    }
    i += 1;
  }

  // Make paths absolute
  let cwd = env::current_dir().map_err(|e| e.to_string())?;
  let output = if output.is_relative() {
    cwd.join(output)
  } else {
    output
  };
  let source_dir = if source_dir.is_relative() {
    cwd.join(source_dir)
  } else {
    source_dir
  };

  Ok(BuildContext {
    prefix: output,
    source_dir,
    jobs,
    libs,
    static_libs,
    ffmpeg_version,
    verbose,
  })
}

fn main() {
  let args: Vec<String> = env::args().collect();
  let mut ctx = match parse_args(&args) {
    Ok(ctx) => ctx,
    Err(e) => {
      eprintln!("Error: {}", e);
      print_usage();
      std::process::exit(1);
    }
  };

  println!("========================================");
  println!("FFmpeg Build Script");
  println!("========================================");
  println!("FFmpeg version: {}", ctx.ffmpeg_version);
  println!("Output directory: {}", ctx.prefix.display());
  println!("Source directory: {}", ctx.source_dir.display());
  println!("Jobs: {}", ctx.jobs);
  println!("Libraries: {:?}", ctx.libs);
  println!(
    "Linking: {}",
    if ctx.static_libs { "static" } else { "shared" }
  );
  println!("========================================");

  if let Err(e) = ctx.build_all() {
    eprintln!("Build failed: {}", e);
    std::process::exit(1);
  }

  println!();
  println!("========================================");
  println!("Build completed successfully!");
  println!("========================================");
  println!();
  println!("To use the built FFmpeg, set:");
  println!("  export FFMPEG_DIR={}", ctx.prefix.display());
  println!();
  println!("and enable these features:");
  println!(
    "  ffmpeg-capability-sys = {{ version = \"0.1\", features = [{}] }}",
    cargo_features(ctx.libs, ctx.static_libs)
      .split(',')
      .map(|f| format!("\"{}\"", f))
      .collect::<Vec<_>>()
      .join(", ")
  );
  println!();
}

#[cfg(test)]
mod tests {
  use super::*;

  fn args(list: &[&str]) -> Vec<String> {
    std::iter::once("build-ffmpeg")
      .chain(list.iter().copied())
      .map(String::from)
      .collect()
  }

  #[test]
  fn test_configure_flags_cover_every_library() {
    let libs = Capabilities::empty()
      .with(Library::Avutil)
      .with(Library::Swscale);
    let flags = configure_library_flags(libs);
    assert_eq!(flags.len(), 8);
    assert!(flags.contains(&"--enable-avutil".to_string()));
    assert!(flags.contains(&"--enable-swscale".to_string()));
    assert!(flags.contains(&"--disable-avcodec".to_string()));
    assert!(flags.contains(&"--disable-postproc".to_string()));
  }

  #[test]
  fn test_dependencies_are_enabled() {
    let ctx = parse_args(&args(&["--libs", "avformat"])).unwrap();
    let configure = ctx.configure_args();
    assert!(configure.contains(&"--enable-avformat".to_string()));
    assert!(configure.contains(&"--enable-avcodec".to_string()));
    assert!(configure.contains(&"--enable-avutil".to_string()));
    assert!(configure.contains(&"--disable-swscale".to_string()));
    assert!(!configure.contains(&"--disable-avcodec".to_string()));

    // The printed feature list stays the user's selection
    assert_eq!(ctx.libs, Capabilities::empty().with(Library::Avformat));
    assert_eq!(cargo_features(ctx.libs, false), "libavformat");
  }

  #[test]
  fn test_postproc_enables_gpl() {
    let ctx = parse_args(&args(&["--libs", "avutil,postproc"])).unwrap();
    assert!(ctx.configure_args().contains(&"--enable-gpl".to_string()));

    let ctx = parse_args(&args(&["--libs", "avutil"])).unwrap();
    assert!(!ctx.configure_args().contains(&"--enable-gpl".to_string()));
  }

  #[test]
  fn test_static_switches_library_kind() {
    let ctx = parse_args(&args(&["--static"])).unwrap();
    let configure = ctx.configure_args();
    assert!(configure.contains(&"--enable-static".to_string()));
    assert!(configure.contains(&"--disable-shared".to_string()));
  }

  #[test]
  fn test_parse_args() {
    let ctx = parse_args(&args(&[
      "-j",
      "3",
      "--libs",
      "libavcodec,avutil",
      "--ffmpeg-version",
      "n6.1",
    ]))
    .unwrap();
    assert_eq!(ctx.jobs, 3);
    assert_eq!(ctx.ffmpeg_version, "n6.1");
    assert_eq!(
      ctx.libs,
      Capabilities::empty()
        .with(Library::Avcodec)
        .with(Library::Avutil)
    );
    assert!(ctx.prefix.is_absolute());

    let defaults = parse_args(&args(&[])).unwrap();
    assert_eq!(defaults.libs, Capabilities::all());
    assert!(!defaults.static_libs);
  }

  #[test]
  fn test_parse_args_errors() {
    assert!(parse_args(&args(&["--libs", "avfoo"])).is_err());
    assert!(parse_args(&args(&["--libs", ","])).is_err());
    assert!(parse_args(&args(&["--jobs"])).is_err());
    assert!(parse_args(&args(&["-j", "many"])).is_err());
    assert!(parse_args(&args(&["--bogus"])).is_err());
  }

  #[test]
  fn test_cargo_features() {
    let libs = Capabilities::empty()
      .with(Library::Swscale)
      .with(Library::Avutil);
    assert_eq!(cargo_features(libs, false), "libavutil,libswscale");
    assert_eq!(cargo_features(libs, true), "libavutil,libswscale,static");
  }
}
