use thiserror::Error;

/// Failure to decode a raw DOM attribute into a typed state value.
#[derive(Debug, Error)]
pub enum AttrError {
    #[error("malformed json value: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures reported by a [`Host`](crate::host::Host) while mutating its tree.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("cannot parse fragment at byte {offset}: {reason}")]
    Parse { offset: usize, reason: &'static str },
    #[error("node is not part of this host")]
    UnknownNode,
    #[error("dom operation failed: {0}")]
    Dom(String),
}

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("attribute `{attribute}`: {source}")]
    Attribute {
        attribute: String,
        #[source]
        source: AttrError,
    },
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("no child component matches `{selector}`")]
    MissingChild { selector: String },
    #[error("state callback failed: {0}")]
    Callback(#[source] Box<dyn std::error::Error>),
}

impl ComponentError {
    /// Wrap an error raised inside a user callback or listener.
    pub fn callback(err: impl std::error::Error + 'static) -> Self {
        ComponentError::Callback(Box::new(err))
    }
}
