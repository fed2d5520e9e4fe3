pub mod classifier;
pub mod detector;
pub mod labels;

use std::fs;
use std::path::Path;

use anyhow::Result;
use image::{imageops::FilterType, RgbImage};
use ndarray::Array4;
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;

/// Build a session for a weight file. CUDA is optional: it is registered
/// when available, otherwise the session runs on CPU.
pub(crate) fn load_session(path: &Path) -> Result<Session> {
    let mut builder = Session::builder()?.with_intra_threads(4)?;

    let cuda = CUDAExecutionProvider::default().build();
    if let Ok(builder_with_cuda) = builder.clone().with_execution_providers([cuda]) {
        builder = builder_with_cuda;
    }

    let model_bytes = fs::read(path)?;
    Ok(builder.commit_from_memory(&model_bytes)?)
}

/// Resize to the model's square input and normalize to CHW float [0,1].
pub(crate) fn image_tensor(rgb: &RgbImage, imgsz: usize) -> Array4<f32> {
    let resized = image::imageops::resize(rgb, imgsz as u32, imgsz as u32, FilterType::Nearest);

    let mut input = Array4::<f32>::zeros((1, 3, imgsz, imgsz));
    for (x, y, pixel) in resized.enumerate_pixels() {
        input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
        input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
        input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
    }
    input
}
