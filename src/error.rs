use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Layout failures. These indicate a pane was built wrong, not a runtime condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("field {index} has no valid flow directive")]
    InvalidFlow { index: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("unknown menu `{0}`")]
    UnknownMenu(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("menu error: {0}")]
    Menu(#[from] MenuError),
}
