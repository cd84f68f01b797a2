//! User-facing notifications.

/// A blocking notification shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The action completed.
    Success(String),
    /// The request was sent and failed.
    Failure(String),
    /// Input was rejected before any request was issued.
    Invalid(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Failure(m) | Notice::Invalid(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
