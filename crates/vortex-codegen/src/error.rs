use std::fmt;

/// A failure while lowering a [`WidgetTree`](vortex_dart::WidgetTree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The tree is structurally inconsistent. Reported before any text is
    /// emitted.
    InvalidTree {
        /// Location in the tree, e.g. `Scaffold/appBar:AppBar/title:Text`.
        path: String,
        reason: String,
    },
}

impl GenerateError {
    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        GenerateError::InvalidTree { path: path.into(), reason: reason.into() }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::InvalidTree { path, reason } => {
                write!(f, "invalid widget tree at {path}: {reason}")
            }
        }
    }
}

impl std::error::Error for GenerateError {}
