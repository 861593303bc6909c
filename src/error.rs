use thiserror::Error;

pub type Result<T> = std::result::Result<T, WidgetError>;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("template error: {0}")]
    Template(String),
    #[error("unknown element id: {0}")]
    UnknownElement(String),
    #[error("widget tag already registered: {0}")]
    DuplicateTag(String),
    #[error("unknown widget tag: {0}")]
    UnknownTag(String),
    #[error("payment gateway error: {0}")]
    Gateway(String),
}
