fn main() {
    // Digest of the default model, kept next to it; overridable via env var
    let model_hash = std::env::var("LUNG_PREDICT_MODEL_SHA256")
        .ok()
        .or_else(|| read_checksum("lung_cancer_model.onnx.sha256"))
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=MODEL_SHA256={}", model_hash);

    println!("cargo:rerun-if-changed=lung_cancer_model.onnx.sha256");
    println!("cargo:rerun-if-env-changed=LUNG_PREDICT_MODEL_SHA256");
}

/// Read the first whitespace-separated token, so `sha256sum` output works as-is.
fn read_checksum(path: &str) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    content.split_whitespace().next().map(|s| s.to_lowercase())
}
