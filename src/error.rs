//! Errors raised while wiring the game into the page.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(&'static str),
    #[error("element #{id} is not a {expected}")]
    WrongElementType { id: &'static str, expected: &'static str },
    #[error("canvas has no 2d rendering context")]
    NoContext,
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<PageError> for JsValue {
    fn from(err: PageError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type PageResult<T> = Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_element() {
        assert_eq!(PageError::MissingElement("game").to_string(), "element #game not found");
        let err = PageError::WrongElementType { id: "vol", expected: "HtmlInputElement" };
        assert_eq!(err.to_string(), "element #vol is not a HtmlInputElement");
    }
}
