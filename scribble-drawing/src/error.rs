use scribble_component::{ComponentError, HostError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrawingError {
    #[error("drawing element has no canvas in its content")]
    MissingCanvas,
    #[error(transparent)]
    Component(#[from] ComponentError),
    #[error(transparent)]
    Host(#[from] HostError),
}
