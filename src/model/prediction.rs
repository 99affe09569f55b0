use std::fmt;

use tract_onnx::prelude::tract_ndarray::Array2;

use crate::error::{ClassifyError, Result};

/// Per-class scores for a single image, shaped 1xC.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    scores: Array2<f32>,
    argmax: usize,
}

impl Prediction {
    pub fn new(scores: Array2<f32>) -> Result<Self> {
        if scores.nrows() != 1 {
            return Err(ClassifyError::Shape(format!(
                "expected a single row of scores, got shape {:?}",
                scores.shape()
            )));
        }
        if scores.ncols() == 0 {
            return Err(ClassifyError::Shape("model produced no class scores".into()));
        }
        let argmax = argmax(scores.iter().copied());
        Ok(Self { scores, argmax })
    }

    #[cfg(test)]
    pub fn from_scores(scores: Vec<f32>) -> Result<Self> {
        let len = scores.len();
        let scores = Array2::from_shape_vec((1, len), scores)
            .map_err(|e| ClassifyError::Shape(e.to_string()))?;
        Self::new(scores)
    }

    pub fn num_classes(&self) -> usize {
        self.scores.ncols()
    }

    /// Index of the highest score.
    pub fn argmax(&self) -> usize {
        self.argmax
    }

    /// The highest score; always `scores[argmax]`, so NaN when any score is NaN.
    pub fn max(&self) -> f32 {
        self.scores[[0, self.argmax]]
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scores)
    }
}

/// First index of the maximum. A NaN wins over everything, first one first.
fn argmax(values: impl Iterator<Item = f32>) -> usize {
    let mut best: Option<(usize, f32)> = None;
    for (i, v) in values.enumerate() {
        if v.is_nan() {
            return i;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i).unwrap_or(0)
}
