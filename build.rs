use std::env;
use std::path::{Path, PathBuf};

/// Environment variables that change how `ffmpeg-sys-next` finds FFmpeg.
const WATCHED_VARIABLES: [&str; 5] = [
    "FFMPEG_DIR",
    "FFMPEG_PKG_CONFIG_PATH",
    "VCPKG_ROOT",
    "VCPKGRS_DYNAMIC",
    "VCPKGRS_TRIPLET",
];

fn warn(message: &str) {
    println!("cargo:warning={message}");
}

fn main() {
    for variable in WATCHED_VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    // pkg-config finds FFmpeg everywhere but Windows.
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }
    if env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        warn(
            "FFMPEG_DIR is not set. On Windows, install FFmpeg through vcpkg and set VCPKG_ROOT or FFMPEG_DIR before building stillframe.",
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let install_dir: PathBuf = Path::new(&vcpkg_root).join("installed").join(&triplet);

    if !install_dir.join("include").join("libavcodec").exists() {
        warn(&format!(
            "VCPKG_ROOT is set but FFmpeg headers were not found under {}.",
            install_dir.display()
        ));
        return;
    }

    warn(&format!(
        "Using vcpkg FFmpeg at {0}. Set FFMPEG_DIR={0} to skip this lookup.",
        install_dir.display()
    ));
    if env::var_os("VCPKGRS_DYNAMIC").is_none() {
        warn("Set VCPKGRS_DYNAMIC=1 if this is a dynamic vcpkg FFmpeg build.");
    }
}
