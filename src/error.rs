use thiserror::Error;

/// Every failure in this crate degrades to a safe default; none is fatal.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("step {0} does not exist")]
    InvalidStepRequested(u8),
    #[error("confirmation rejected after {moves} of {required} moves")]
    PrematureConfirmation { moves: u32, required: u32 },
    #[error("persisted selections are malformed: {0}")]
    MalformedPersistedState(#[source] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(#[source] serde_json::Error),
}

impl From<FlowError> for wasm_bindgen::JsValue {
    fn from(err: FlowError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
