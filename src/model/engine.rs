use log::{debug, info};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};
use tract_onnx::prelude::tract_ndarray::{Array2, Array4, Ix2};
use tract_onnx::prelude::*;

use super::prediction::Prediction;
use crate::error::{ClassifyError, Result};
use crate::preprocess::INPUT_SHAPE;

type Plan = TypedRunnableModel<TypedModel>;

/// A loaded, optimized model ready to run forward passes.
pub struct Engine {
    plan: Plan,
    path: PathBuf,
}

impl Engine {
    /// Load the ONNX model at `model_path`, fixing its input to a 1x224x224x3
    /// f32 tensor. When `expected_sha256` is given the file is hashed first.
    pub fn new(model_path: &Path, expected_sha256: Option<&str>) -> Result<Self> {
        if let Some(expected) = expected_sha256 {
            verify_checksum(model_path, expected)?;
        }

        info!("loading model {}", model_path.display());
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(|e| ClassifyError::Load {
                path: model_path.to_path_buf(),
                reason: format!("{e:#}"),
            })?;

        let plan = model
            .with_input_fact(0, f32::fact(INPUT_SHAPE).into())
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| {
                ClassifyError::Shape(format!(
                    "model does not accept a {:?} f32 input: {e:#}",
                    INPUT_SHAPE
                ))
            })?;

        // Some broadcast conflicts only surface at evaluation time
        let blank = Array4::<f32>::zeros(INPUT_SHAPE);
        let dry_run = run_scores(&plan, &blank).map_err(|e| match e {
            ClassifyError::Inference(reason) => ClassifyError::Shape(format!(
                "model does not accept a {:?} f32 input: {reason}",
                INPUT_SHAPE
            )),
            other => other,
        })?;
        let classes = Prediction::new(dry_run)?.num_classes();
        info!("model loaded ({classes} classes)");

        Ok(Self {
            plan,
            path: model_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one forward pass. The output must be a 1xC f32 tensor.
    pub fn predict(&self, input: &Array4<f32>) -> Result<Prediction> {
        if input.shape() != &INPUT_SHAPE[..] {
            return Err(ClassifyError::Shape(format!(
                "expected input shape {:?}, got {:?}",
                INPUT_SHAPE,
                input.shape()
            )));
        }

        Prediction::new(run_scores(&self.plan, input)?)
    }
}

/// One forward pass, reshaped to the 1xC score matrix.
fn run_scores(plan: &Plan, input: &Array4<f32>) -> Result<Array2<f32>> {
    let tensor: Tensor = input.clone().into();
    let outputs = plan
        .run(tvec!(tensor.into()))
        .map_err(|e| ClassifyError::Inference(format!("{e:#}")))?;
    let output = outputs
        .first()
        .ok_or_else(|| ClassifyError::Inference("model produced no outputs".into()))?;
    debug!("raw output shape {:?}", output.shape());

    let scores = output
        .to_array_view::<f32>()
        .map_err(|e| ClassifyError::Shape(format!("output is not f32: {e:#}")))?
        .into_dimensionality::<Ix2>()
        .map_err(|e| {
            ClassifyError::Shape(format!(
                "expected a 1xC output, got {:?}: {e}",
                output.shape()
            ))
        })?
        .to_owned();
    Ok(scores)
}

/// Hash the model file and compare against `expected` (hex, any case).
fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    let actual = sha256_file(path).map_err(|e| ClassifyError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let expected = expected.trim().to_lowercase();
    if actual != expected {
        return Err(ClassifyError::Checksum {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }
    debug!("model checksum ok ({})", actual);
    Ok(())
}

pub(crate) fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
