use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Plotters backend errors are generic over the backend type, so they
    /// are collapsed to their message at this boundary.
    #[error("chart rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn render(err: impl std::fmt::Display) -> Self {
        Error::Render(err.to_string())
    }
}
