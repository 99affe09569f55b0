pub mod engine;
mod prediction;

pub use engine::Engine;
pub use prediction::Prediction;

const MODEL_SHA256: &str = env!("MODEL_SHA256");

/// Model digest baked in at build time, if a checksum file was present.
pub fn embedded_sha256() -> Option<&'static str> {
    build_digest(MODEL_SHA256)
}

fn build_digest(value: &str) -> Option<&str> {
    match value.trim() {
        "" | "unknown" => None,
        hash => Some(hash),
    }
}
