use serde::{Deserialize, Serialize};

/// Requirements after the parsing stage: the user's raw text plus the
/// structured breakdown produced by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedRequirements {
    pub raw: String,
    pub parsed: String,
}

/// The pipeline's product: generated code and its test suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedArtifacts {
    pub code: String,
    pub tests: String,
}
