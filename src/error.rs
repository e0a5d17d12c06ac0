use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element {0}")]
    MissingElement(String),
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("javascript error: {0}")]
    Js(String),
    #[cfg(feature = "serde_json")]
    #[error("invalid tuning: {0}")]
    Config(String),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
