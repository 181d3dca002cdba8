use std::time::Instant;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};
use rayon::prelude::*;

use super::{
    detector::DetectorProcess,
    source::{LandmarkSource, SourceError},
};
use crate::{
    config::{CameraSource as CameraSelector, Config},
    types::{Frame, LandmarkFrame},
};

// Prefer pixel formats that are widely supported on macOS (the built-in cameras
// often reject YUYV even though Nokhwa reports it).
const PREFERRED_PIXEL_FORMATS: &[FrameFormat] = &[
    FrameFormat::MJPEG,
    FrameFormat::NV12,
    FrameFormat::RAWRGB,
    FrameFormat::RAWBGR,
];

const PREFERRED_FPS: u32 = 30;

fn requested_formats(width: u32, height: u32) -> [RequestedFormat<'static>; 4] {
    [
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::MJPEG,
            PREFERRED_FPS,
        ))),
        RequestedFormat::with_formats(
            RequestedFormatType::AbsoluteHighestFrameRate,
            PREFERRED_PIXEL_FORMATS,
        ),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::None),
    ]
}

fn camera_index(selector: &CameraSelector) -> CameraIndex {
    match selector {
        CameraSelector::Index(index) => CameraIndex::Index(*index),
        CameraSelector::Name(name) => CameraIndex::String(name.clone()),
    }
}

fn build_camera(index: CameraIndex, width: u32, height: u32) -> Result<Camera, SourceError> {
    let mut last_err = None;

    for requested in requested_formats(width, height) {
        match Camera::new(index.clone(), requested) {
            Ok(mut camera) => match camera.open_stream() {
                Ok(()) => return Ok(camera),
                Err(err) => last_err = Some(err),
            },
            Err(err) => last_err = Some(err),
        }
    }

    Err(SourceError::Camera(match last_err {
        Some(err) => err.to_string(),
        None => "failed to open camera with any supported format".into(),
    }))
}

/// Mirrors packed RGB rows in place.
pub fn mirror_rgb(rgb: &mut [u8], width: usize) {
    if width < 2 {
        return;
    }
    rgb.par_chunks_exact_mut(width * 3).for_each(|row| {
        for left in 0..width / 2 {
            let right = width - 1 - left;
            for c in 0..3 {
                row.swap(left * 3 + c, right * 3 + c);
            }
        }
    });
}

/// Live camera frames run through the pose-detector sidecar, one at a time.
pub struct CameraSource {
    camera: Camera,
    detector: DetectorProcess,
    mirror: bool,
}

impl CameraSource {
    pub fn open(config: &Config) -> Result<Self, SourceError> {
        let camera = build_camera(
            camera_index(&config.camera_source),
            config.frame_width,
            config.frame_height,
        )?;
        let resolution = camera.resolution();
        log::info!(
            "camera {:?} streaming at {}x{}",
            config.camera_source,
            resolution.width(),
            resolution.height()
        );

        let detector = DetectorProcess::spawn(&config.detector)?;
        Ok(Self {
            camera,
            detector,
            mirror: config.mirror,
        })
    }

    fn capture(&mut self) -> Result<Frame, SourceError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|err| SourceError::Camera(err.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|err| SourceError::Camera(err.to_string()))?;

        let (width, height) = decoded.dimensions();
        let mut rgb = decoded.into_raw();
        if self.mirror {
            mirror_rgb(&mut rgb, width as usize);
        }

        Ok(Frame {
            rgb,
            width,
            height,
            timestamp: Instant::now(),
        })
    }
}

impl LandmarkSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, SourceError> {
        let frame = self.capture()?;
        self.detector.detect(&frame).map(Some)
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}
