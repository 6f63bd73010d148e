use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use stillframe::{
    AppInfo, CancellationToken, ExportRequest, FfmpegLogLevel, FrameGrabber, ImageFormat,
    OutputSize, PlaybackDriver, PresetCategory, TickOutcome, VideoMetadata, conversion, files,
    resize,
};

const CLI_AFTER_HELP: &str = "Examples:\n  stillframe info clip.mp4 --json\n  stillframe export clip.mp4 --at 00:12.5 --out still.png --width 1280\n  stillframe export clip.mp4 --at 250 --dir stills --preset fhd\n  stillframe play clip.mp4 --from 10s --frames 90\n  stillframe completions zsh > _stillframe";

#[derive(Debug, Parser)]
#[command(
    name = "stillframe",
    version,
    about = "Grab still frames from video files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Allow overwriting existing output files.
    #[arg(long, global = true)]
    overwrite: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print video metadata.
    #[command(
        about = "Print video metadata",
        visible_alias = "probe",
        after_help = "Examples:\n  stillframe info clip.mp4\n  stillframe info clip.mp4 --json"
    )]
    Info {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate a video and print a report.
    #[command(
        about = "Validate video file",
        after_help = "Examples:\n  stillframe validate clip.mp4"
    )]
    Validate {
        /// Input video path.
        input: PathBuf,
    },

    /// Export one frame as an image.
    #[command(
        about = "Export a frame",
        after_help = "Positions: a frame number (250), seconds (12.5s), or a timecode (00:12.5, 0:01:02).\n\nExamples:\n  stillframe export clip.mp4 --at 250\n  stillframe export clip.mp4 --at 1:02 --out still.webp --width 640\n  stillframe export clip.mp4 --at 10s --dir stills --preset instagram-square"
    )]
    Export {
        /// Input video path.
        input: PathBuf,
        /// Frame to export.
        #[arg(long, default_value = "0")]
        at: String,
        /// Output file. The format is taken from its extension unless --format is given.
        #[arg(long, conflicts_with = "dir")]
        out: Option<PathBuf>,
        /// Output directory for a default-named file.
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Output image format (jpeg, png, bmp, tiff, webp).
        #[arg(long)]
        format: Option<String>,
        /// Output width. Alone, the height follows the video's proportions.
        #[arg(long)]
        width: Option<u32>,
        /// Output height. Alone, the width follows the video's proportions.
        #[arg(long)]
        height: Option<u32>,
        /// Use a named resolution preset (see `stillframe presets`).
        #[arg(long, conflicts_with_all = ["width", "height"])]
        preset: Option<String>,
        /// Use width and height exactly instead of fitting inside them.
        #[arg(long)]
        stretch: bool,
        /// JPEG quality (1-100).
        #[arg(long, default_value_t = stillframe::DEFAULT_JPEG_QUALITY)]
        quality: u8,
    },

    /// Play a video frame by frame in the terminal.
    #[command(
        about = "Play back frames",
        after_help = "Examples:\n  stillframe play clip.mp4\n  stillframe play clip.mp4 --from 00:30 --frames 120 --export stills"
    )]
    Play {
        /// Input video path.
        input: PathBuf,
        /// Start position.
        #[arg(long)]
        from: Option<String>,
        /// Stop after this many frames.
        #[arg(long)]
        frames: Option<u64>,
        /// Milliseconds between frames.
        #[arg(long, default_value_t = 33)]
        interval: u64,
        /// Export the frame playback stops on into this directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// List video files in a directory.
    #[command(
        about = "List video files",
        after_help = "Examples:\n  stillframe scan ~/Videos"
    )]
    Scan {
        /// Directory to scan.
        directory: PathBuf,
        /// Print each file's resolution and duration.
        #[arg(long)]
        details: bool,
    },

    /// List resolution presets.
    #[command(about = "List resolution presets")]
    Presets {
        /// Only list one category (landscape, portrait, social).
        #[arg(long)]
        category: Option<String>,
    },

    /// Print application information.
    #[command(about = "About stillframe")]
    About,

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Where to put the grabber before acting.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Position {
    Frame(u64),
    Time(Duration),
}

fn parse_position(value: &str) -> Result<Position, Box<dyn std::error::Error>> {
    let trimmed = value.trim();
    if trimmed.contains(':') {
        return Ok(Position::Time(parse_timecode(trimmed)?));
    }
    if let Some(seconds) = trimmed.strip_suffix('s') {
        return Ok(Position::Time(parse_timecode(seconds)?));
    }
    Ok(Position::Frame(trimmed.parse::<u64>().map_err(|_| {
        format!("invalid position '{trimmed}' (expected a frame number, seconds like 12.5s, or a timecode)")
    })?))
}

fn parse_timecode(value: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("time value cannot be empty".into());
    }

    if let Ok(seconds) = trimmed.parse::<f64>() {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(format!("invalid time: {trimmed}").into());
        }
        return Duration::try_from_secs_f64(seconds)
            .map_err(|_| format!("time out of range: {trimmed}").into());
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(format!("invalid time format: {trimmed}").into());
    }

    let (hours, minutes, seconds_str) = if parts.len() == 3 {
        (parts[0].parse::<u64>()?, parts[1].parse::<u64>()?, parts[2])
    } else {
        (0_u64, parts[0].parse::<u64>()?, parts[1])
    };

    let seconds = seconds_str.parse::<f64>()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("invalid time: {trimmed}").into());
    }
    let total_seconds = (hours as f64 * 3600.0) + (minutes as f64 * 60.0) + seconds;
    Duration::try_from_secs_f64(total_seconds)
        .map_err(|_| format!("time out of range: {trimmed}").into())
}

fn parse_category(value: &str) -> Option<PresetCategory> {
    match value.to_ascii_lowercase().as_str() {
        "landscape" | "wide" => Some(PresetCategory::Landscape),
        "portrait" | "vertical" => Some(PresetCategory::Portrait),
        "social" | "social-media" | "socialmedia" => Some(PresetCategory::SocialMedia),
        _ => None,
    }
}

fn move_to(
    grabber: &mut FrameGrabber,
    position: Position,
) -> Result<(), Box<dyn std::error::Error>> {
    match position {
        Position::Frame(frame_number) => grabber.seek_to_frame(frame_number)?,
        Position::Time(timestamp) => grabber.seek_to_time(timestamp)?,
    }
    Ok(())
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if global.verbose { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if global.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if let Some(level) = &global.log_level {
        let parsed: FfmpegLogLevel = level
            .parse()
            .map_err(|_| format!("unsupported --log-level: {level}"))?;
        stillframe::set_ffmpeg_log_level(parsed);
    }

    Ok(())
}

fn metadata_json(path: &Path, metadata: &VideoMetadata) -> serde_json::Value {
    json!({
        "path": path.display().to_string(),
        "format": metadata.format,
        "codec": metadata.codec,
        "width": metadata.width,
        "height": metadata.height,
        "aspect_ratio": resize::aspect_ratio_label(metadata.size()),
        "fps": metadata.frames_per_second,
        "frame_count": metadata.frame_count,
        "duration_seconds": metadata.duration.as_secs_f64(),
    })
}

fn print_metadata(metadata: &VideoMetadata) {
    println!("Format: {} [{}]", metadata.format, metadata.codec);
    println!(
        "Resolution: {}x{} ({})",
        metadata.width,
        metadata.height,
        resize::aspect_ratio_label(metadata.size())
    );
    println!("Frame rate: {:.3} fps", metadata.frames_per_second);
    println!("Frames: {}", metadata.frame_count);
    println!(
        "Duration: {} ({:.3}s)",
        conversion::format_clock(metadata.duration),
        metadata.duration.as_secs_f64()
    );
}

fn success(message: String) {
    println!("{} {}", "success:".green().bold(), message.green());
}

#[allow(clippy::too_many_arguments)]
fn export_frame(
    global: &GlobalOptions,
    input: &Path,
    at: &str,
    out: Option<PathBuf>,
    dir: Option<PathBuf>,
    format: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    preset: Option<String>,
    stretch: bool,
    quality: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = format.map(|value| value.parse::<ImageFormat>()).transpose()?;

    let mut grabber = FrameGrabber::open(input)?;
    move_to(&mut grabber, parse_position(at)?)?;

    let output_path = match out {
        Some(path) => path,
        None => grabber.default_output_path(
            dir.unwrap_or_else(|| PathBuf::from(".")),
            format.unwrap_or_default(),
        )?,
    };

    let mut request = ExportRequest::new(output_path).with_jpeg_quality(quality);
    if let Some(format) = format {
        request = request.with_format(format);
    }
    if let Some(name) = preset {
        let preset = stillframe::find_preset(&name)
            .ok_or_else(|| format!("unknown preset '{name}' (see `stillframe presets`)"))?;
        request = request.with_size(OutputSize::fit(preset.size));
    }
    if let Some(width) = width {
        request = request.with_width(width);
    }
    if let Some(height) = height {
        request = request.with_height(height);
    }
    if stretch {
        request = request.with_keep_aspect_ratio(false);
    }

    let (_, target) = request.resolve_target()?;
    ensure_writable_path(&target, global.overwrite)?;

    let written = grabber.export_current_frame(&request)?;
    success(format!(
        "Exported frame {} ({}) to {}",
        grabber.current_index().unwrap_or(0),
        grabber.position_label().unwrap_or_default(),
        written.display()
    ));
    Ok(())
}

fn play(
    global: &GlobalOptions,
    input: &Path,
    from: Option<String>,
    frames: Option<u64>,
    interval: u64,
    export: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut grabber = FrameGrabber::open(input)?;
    if let Some(from) = from {
        move_to(&mut grabber, parse_position(&from)?)?;
    }
    let frame_count = grabber.metadata().map_or(0, |metadata| metadata.frame_count);
    let start = grabber.current_index().unwrap_or(0);

    let token = CancellationToken::new();
    let mut driver = PlaybackDriver::new()
        .with_interval(Duration::from_millis(interval))
        .with_cancellation(token.clone());

    let progress_bar = ProgressBar::new(frame_count);
    let style = ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
    progress_bar.set_style(style.progress_chars("##-"));
    progress_bar.set_position(start + 1);
    progress_bar.set_message(grabber.position_label().unwrap_or_default());

    driver.play();
    let outcome = driver.run(&mut grabber, |grabber| {
        let index = grabber.current_index().unwrap_or(0);
        progress_bar.set_position(index + 1);
        progress_bar.set_message(grabber.position_label().unwrap_or_default());
        if frames.is_some_and(|limit| index.saturating_sub(start) >= limit) {
            token.cancel();
        }
    });
    progress_bar.finish();

    let index = grabber.current_index().unwrap_or(0);
    match outcome {
        TickOutcome::Stopped(error) => return Err(error.into()),
        TickOutcome::Finished => success(format!("Reached the last frame ({index})")),
        TickOutcome::Idle | TickOutcome::Advanced(_) => {
            success(format!("Stopped at frame {index}"));
        }
    }

    if let Some(directory) = export {
        let path = grabber.default_output_path(directory, ImageFormat::default())?;
        ensure_writable_path(&path, global.overwrite)?;
        let written = grabber.export_current_frame(&ExportRequest::new(path))?;
        success(format!("Exported frame {index} to {}", written.display()));
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Info { input, json } => {
            let grabber = FrameGrabber::open(&input)?;
            let metadata = grabber.metadata().ok_or("No video loaded")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&metadata_json(&input, metadata))?
                );
            } else {
                println!("File: {}", input.display());
                print_metadata(metadata);
            }
        }
        Commands::Validate { input } => {
            let grabber = FrameGrabber::open(&input)?;
            let report = grabber.validate().ok_or("No video loaded")?;
            print!("{report}");
            if !report.is_valid() {
                return Err("validation failed".into());
            }
        }
        Commands::Export {
            input,
            at,
            out,
            dir,
            format,
            width,
            height,
            preset,
            stretch,
            quality,
        } => export_frame(
            &cli.global,
            &input,
            &at,
            out,
            dir,
            format,
            width,
            height,
            preset,
            stretch,
            quality,
        )?,
        Commands::Play {
            input,
            from,
            frames,
            interval,
            export,
        } => play(&cli.global, &input, from, frames, interval, export)?,
        Commands::Scan { directory, details } => {
            let videos = files::video_files_in_directory(&directory)?;
            if videos.is_empty() {
                println!("No video files in {}", directory.display());
            }
            for video in &videos {
                if !details {
                    println!("{}", video.display());
                    continue;
                }
                match FrameGrabber::open(video) {
                    Ok(grabber) => {
                        let summary = grabber
                            .metadata()
                            .map(|metadata| {
                                format!(
                                    "{}x{} {:.2} fps {}",
                                    metadata.width,
                                    metadata.height,
                                    metadata.frames_per_second,
                                    conversion::format_clock(metadata.duration)
                                )
                            })
                            .unwrap_or_default();
                        println!("{}  {}", video.display(), summary.dimmed());
                    }
                    Err(error) => println!(
                        "{}  {}",
                        video.display(),
                        error.to_string().yellow()
                    ),
                }
            }
        }
        Commands::Presets { category } => {
            let categories = match category {
                Some(value) => vec![
                    parse_category(&value)
                        .ok_or(format!("unsupported --category: {value}"))?,
                ],
                None => PresetCategory::ALL.to_vec(),
            };
            for category in categories {
                println!("{}", category.to_string().bold());
                for preset in stillframe::presets_in(category) {
                    println!(
                        "  {:<20} {:>11}  {:<6} {}",
                        preset.name,
                        preset.size.to_string(),
                        resize::aspect_ratio_label(preset.size),
                        preset.label
                    );
                }
            }
        }
        Commands::About => {
            print!("{}", AppInfo::from_manifest().about_text());
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "stillframe", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
