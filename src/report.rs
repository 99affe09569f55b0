use std::io::{self, Write};

use crate::model::Prediction;

/// Write the score vector, the predicted class index and its score, one per line.
pub fn write_report<W: Write>(out: &mut W, prediction: &Prediction) -> io::Result<()> {
    writeln!(out, "{prediction}")?;
    writeln!(out, "{}", prediction.argmax())?;
    writeln!(out, "{}", prediction.max())?;
    out.flush()
}
