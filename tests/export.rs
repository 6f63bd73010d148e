//! Frame export integration tests.
//!
//! Frames come from an in-memory decoder; images are written into temporary
//! directories and read back with the `image` crate.

mod common;

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};

use common::{ScriptedDecoder, grabber_with_frames, metadata};
use image::{DynamicImage, GenericImageView};
use stillframe::{
    ExportRequest, FrameGrabber, ImageEncoder, ImageFileEncoder, ImageFormat, OutputSize, Size,
    StillframeError,
};

fn grabber_1920x1080() -> FrameGrabber<ScriptedDecoder> {
    FrameGrabber::with_decoder(ScriptedDecoder::new(metadata(1920, 1080, 25.0, 10)))
        .expect("Failed to load scripted decoder")
}

#[test]
fn export_native_size_png() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut grabber = grabber_with_frames(10);
    grabber.seek_to_frame(4).expect("Failed to seek");

    let path = temporary_directory.path().join("frame.png");
    let written = grabber
        .export_current_frame(&ExportRequest::new(&path))
        .expect("Failed to export");

    assert_eq!(written, path);
    let image = image::open(&written).expect("Failed to read exported image");
    assert_eq!(image.dimensions(), (16, 9));
    assert_eq!(image.to_rgb8().get_pixel(0, 0), &common::frame_colour(4));
}

#[test]
fn export_single_dimension_keeps_proportion() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let grabber = grabber_1920x1080();

    let by_width = grabber
        .export_current_frame(
            &ExportRequest::new(temporary_directory.path().join("w.png")).with_width(960),
        )
        .expect("Failed to export by width");
    assert_eq!(image::open(by_width).unwrap().dimensions(), (960, 540));

    let by_height = grabber
        .export_current_frame(
            &ExportRequest::new(temporary_directory.path().join("h.bmp")).with_height(270),
        )
        .expect("Failed to export by height");
    assert_eq!(image::open(by_height).unwrap().dimensions(), (480, 270));
}

#[test]
fn export_bounding_box_and_exact_size() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let grabber = FrameGrabber::with_decoder(ScriptedDecoder::new(metadata(1000, 500, 25.0, 3)))
        .expect("Failed to load scripted decoder");

    let fitted = grabber
        .export_current_frame(
            &ExportRequest::new(temporary_directory.path().join("fit.png"))
                .with_size(OutputSize::fit(Size::new(400, 400))),
        )
        .expect("Failed to export fitted");
    assert_eq!(image::open(fitted).unwrap().dimensions(), (400, 200));

    let stretched = grabber
        .export_current_frame(
            &ExportRequest::new(temporary_directory.path().join("exact.png"))
                .with_width(400)
                .with_height(400)
                .with_keep_aspect_ratio(false),
        )
        .expect("Failed to export stretched");
    assert_eq!(image::open(stretched).unwrap().dimensions(), (400, 400));
}

#[test]
fn export_every_format() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let grabber = grabber_with_frames(2);

    for format in ImageFormat::ALL {
        let path = temporary_directory
            .path()
            .join(format!("frame.{}", format.primary_extension()));
        let written = grabber
            .export_current_frame(&ExportRequest::new(&path))
            .unwrap_or_else(|error| panic!("Failed to export {format}: {error}"));

        let guessed = image::ImageFormat::from_path(&written).expect("Unknown extension");
        let bytes = std::fs::read(&written).expect("Failed to read exported file");
        let detected = image::guess_format(&bytes).expect("Failed to detect format");
        assert_eq!(guessed, detected, "{format} written with the wrong encoder");
    }
}

#[test]
fn export_creates_missing_directories() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let grabber = grabber_with_frames(2);

    let path = temporary_directory
        .path()
        .join("nested")
        .join("deeper")
        .join("frame.jpg");
    let written = grabber
        .export_current_frame(&ExportRequest::new(&path))
        .expect("Failed to export into nested directory");

    assert!(written.is_file());
}

#[test]
fn failed_encode_creates_no_directories() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let nested = temporary_directory.path().join("nested");
    let path = nested.join("deeper").join("frame.jpg");

    // JPEG cannot hold a width above 65535.
    let image = DynamicImage::new_rgb8(70_000, 1);
    let result = ImageFileEncoder::new().encode(&image, ImageFormat::Jpeg, &path);

    assert!(matches!(result, Err(StillframeError::ImageError(_))));
    assert!(!nested.exists());
}

#[test]
fn export_without_extension_appends_one() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let grabber = grabber_with_frames(2);

    let written = grabber
        .export_current_frame(
            &ExportRequest::new(temporary_directory.path().join("still"))
                .with_format(ImageFormat::Webp),
        )
        .expect("Failed to export");
    assert_eq!(written.file_name().unwrap(), "still.webp");
    assert!(written.is_file());

    let written = grabber
        .export_current_frame(&ExportRequest::new(temporary_directory.path().join("plain")))
        .expect("Failed to export");
    assert_eq!(written.file_name().unwrap(), "plain.jpg");
}

#[test]
fn export_unknown_extension_fails_without_writing() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let grabber = grabber_with_frames(2);
    let path = temporary_directory.path().join("frame.gif");

    let result = grabber.export_current_frame(&ExportRequest::new(&path));
    assert!(matches!(
        result,
        Err(StillframeError::UnsupportedImageFormat(_))
    ));
    assert!(!path.exists());

    // An explicit format does not override an extension of another image format.
    let path = temporary_directory.path().join("frame.png");
    let result =
        grabber.export_current_frame(&ExportRequest::new(&path).with_format(ImageFormat::Jpeg));
    assert!(matches!(
        result,
        Err(StillframeError::UnsupportedImageFormat(_))
    ));
    assert!(!path.exists());
}

#[test]
fn export_zero_size_fails() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let grabber = grabber_with_frames(2);
    let path = temporary_directory.path().join("frame.png");

    let result = grabber.export_current_frame(&ExportRequest::new(&path).with_width(0));
    assert!(matches!(
        result,
        Err(StillframeError::InvalidDimensions { .. })
    ));
    assert!(!path.exists());
}

#[test]
fn export_without_frame_fails() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let grabber: FrameGrabber<ScriptedDecoder> = FrameGrabber::default();

    let result = grabber
        .export_current_frame(&ExportRequest::new(temporary_directory.path().join("a.png")));
    assert!(matches!(result, Err(StillframeError::NoFrameDecoded)));

    let result = grabber.default_output_path(temporary_directory.path(), ImageFormat::Jpeg);
    assert!(matches!(result, Err(StillframeError::NoFrameDecoded)));
}

#[test]
fn default_output_path_names_frame() {
    let mut grabber = grabber_with_frames(200);
    grabber.seek_to_frame(123).expect("Failed to seek");

    let path = grabber
        .default_output_path("stills", ImageFormat::Png)
        .expect("Failed to build default path");
    assert_eq!(path, Path::new("stills").join("video_frame_000123.png"));
}

#[test]
fn jpeg_quality_changes_output() {
    let grabber = grabber_with_frames(2);
    let frame = grabber.current_frame().expect("Expected a frame").into_image();

    let low = ImageFileEncoder::new()
        .with_jpeg_quality(5)
        .encode_to_vec(&frame, ImageFormat::Jpeg)
        .expect("Failed to encode low quality");
    let high = ImageFileEncoder::new()
        .with_jpeg_quality(100)
        .encode_to_vec(&frame, ImageFormat::Jpeg)
        .expect("Failed to encode high quality");

    assert_ne!(low, high);
    assert_eq!(ImageFileEncoder::new().with_jpeg_quality(0).jpeg_quality(), 1);
    assert_eq!(ImageFileEncoder::new().with_jpeg_quality(250).jpeg_quality(), 100);
}

/// Records what the grabber asks it to encode instead of writing files.
#[derive(Default)]
struct RecordingEncoder {
    calls: RefCell<Vec<(u32, u32, ImageFormat, PathBuf)>>,
}

impl ImageEncoder for RecordingEncoder {
    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        path: &Path,
    ) -> Result<(), StillframeError> {
        self.calls
            .borrow_mut()
            .push((image.width(), image.height(), format, path.to_path_buf()));
        Ok(())
    }
}

#[test]
fn export_through_custom_encoder() {
    let grabber = grabber_1920x1080();
    let encoder = RecordingEncoder::default();

    let written = grabber
        .export_current_frame_with(
            &encoder,
            &ExportRequest::new("out/frame.TIF").with_height(540),
        )
        .expect("Failed to export");

    assert_eq!(written, PathBuf::from("out/frame.TIF"));
    assert_eq!(
        encoder.calls.borrow().as_slice(),
        &[(960, 540, ImageFormat::Tiff, PathBuf::from("out/frame.TIF"))]
    );
}
