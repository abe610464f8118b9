pub type LaminateResult<T> = Result<T, LaminateError>;

#[derive(thiserror::Error, Debug)]
pub enum LaminateError {
    #[error("tool error: `{command}` failed in {context} ({}): {stderr}", describe_status(.status))]
    Tool {
        command: String,
        context: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("io error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("structure error: {0}")]
    Structure(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("{original} (cleanup also failed: {})", join_errors(.cleanup))]
    Cleanup {
        #[source]
        original: Box<LaminateError>,
        cleanup: Vec<LaminateError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LaminateError {
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Attach cleanup failures to this error without replacing it.
    ///
    /// The returned error still displays `self` first; an empty `cleanup` list returns `self`
    /// unchanged.
    pub fn with_cleanup(self, cleanup: Vec<LaminateError>) -> Self {
        if cleanup.is_empty() {
            return self;
        }
        match self {
            Self::Cleanup {
                original,
                cleanup: mut existing,
            } => {
                existing.extend(cleanup);
                Self::Cleanup {
                    original,
                    cleanup: existing,
                }
            }
            other => Self::Cleanup {
                original: Box::new(other),
                cleanup,
            },
        }
    }

    /// The failure that started unwinding, looking through attached cleanup errors.
    pub fn original(&self) -> &LaminateError {
        match self {
            Self::Cleanup { original, .. } => original.original(),
            other => other,
        }
    }

    /// Cleanup failures attached to this error, if any.
    pub fn cleanup_errors(&self) -> &[LaminateError] {
        match self {
            Self::Cleanup { cleanup, .. } => cleanup,
            _ => &[],
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn join_errors(errors: &[LaminateError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
