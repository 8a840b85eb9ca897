use thiserror::Error;

#[derive(Error, Debug)]
pub enum CadenceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CadenceError {
    /// True for the "nothing to do right now" outcome of a poll.
    /// Workers treat this as idle, not as a failure worth alarming on.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CadenceError::NotFound(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, CadenceError::Duplicate(_))
    }

    pub fn is_bad_request(&self) -> bool {
        matches!(self, CadenceError::BadRequest(_))
    }
}

pub type Result<T> = std::result::Result<T, CadenceError>;
