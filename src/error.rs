use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, UiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("drag event carries no data transfer")]
    NoDataTransfer,

    /// The dragged id does not resolve to a registered element.
    #[error("no element registered under id {0:?}")]
    UnknownElement(String),

    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("dom error: {0}")]
    Dom(String),
}

impl UiError {
    /// Wraps a thrown JS value, keeping its message when it has one.
    pub fn from_js(value: JsValue) -> Self {
        Self::Dom(js_message(&value))
    }
}

impl From<JsValue> for UiError {
    fn from(value: JsValue) -> Self {
        Self::from_js(value)
    }
}

fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Ok(msg) = js_sys::Reflect::get(value, &"message".into()) {
        if let Some(s) = msg.as_string() {
            return s;
        }
    }
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_element_message_names_the_id() {
        let err = UiError::UnknownElement("row-7".to_string());
        assert_eq!(err.to_string(), "no element registered under id \"row-7\"");
    }

    #[test]
    fn test_selector_error_message() {
        let err = UiError::Selector {
            selector: "[[".to_string(),
            reason: "SyntaxError".to_string(),
        };
        assert_eq!(err.to_string(), "invalid selector \"[[\": SyntaxError");
    }
}
