use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageReader};
use log::debug;
use serde::Deserialize;
use tract_onnx::prelude::tract_ndarray::Array4;

use crate::error::{ClassifyError, Result};

pub const INPUT_HEIGHT: u32 = 224;
pub const INPUT_WIDTH: u32 = 224;
pub const INPUT_CHANNELS: usize = 3;

/// Shape of the batch tensor fed to the model: NHWC with a batch of one.
pub const INPUT_SHAPE: [usize; 4] = [
    1,
    INPUT_HEIGHT as usize,
    INPUT_WIDTH as usize,
    INPUT_CHANNELS,
];

/// Resampling filter used when scaling the image to the model input size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Open and decode the image at `path`, then turn it into the model input tensor.
pub fn load_image(path: &Path, filter: ResizeFilter) -> Result<Array4<f32>> {
    let io_err = |source| ClassifyError::Io {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?
        .decode()
        .map_err(|e| match e {
            ImageError::IoError(source) => io_err(source),
            source => ClassifyError::Decode {
                path: path.to_path_buf(),
                source,
            },
        })?;

    debug!(
        "decoded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(to_tensor(&img, filter))
}

/// Resize to 224x224 (aspect ratio is not kept), force 8-bit RGB and add the
/// batch dimension. Pixel values stay in [0, 255].
pub fn to_tensor(img: &DynamicImage, filter: ResizeFilter) -> Array4<f32> {
    let resized = img
        .resize_exact(INPUT_WIDTH, INPUT_HEIGHT, filter.into())
        .to_rgb8();

    Array4::from_shape_fn(INPUT_SHAPE, |(_, y, x, c)| {
        f32::from(resized.get_pixel(x as u32, y as u32)[c])
    })
}
