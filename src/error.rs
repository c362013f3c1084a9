use std::path::PathBuf;

/// Единый тип ошибок PRISM Review Core.
#[derive(thiserror::Error, Debug)]
pub enum PrismError {
    #[error("Selected files do not match <events>/<event>/<station>/[Trouble/]Vx layout: {path:?} has {segments} path segments, at least {required} required")]
    Structure {
        path: PathBuf,
        segments: usize,
        required: usize,
    },

    #[error("Empty selection: {0}")]
    EmptySelection(&'static str),

    #[error("Selected files must share one parent directory: {first:?} vs {other:?}")]
    MixedParents { first: PathBuf, other: PathBuf },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Tree invariant violated: {0}")]
    TreeInvariant(String),

    #[error("Home directory is not available on this OS/user")]
    HomeDirNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("Cannot determine file name for path: {0:?}")]
    FileNameMissing(PathBuf),

    #[error("Build worker terminated without delivering a tree")]
    WorkerGone,
}

impl PrismError {
    /// Ошибка валидации пользовательского ввода (показывается пользователю как есть).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PrismError::Structure { .. }
                | PrismError::EmptySelection(_)
                | PrismError::MixedParents { .. }
                | PrismError::InvalidPath(_)
                | PrismError::NotADirectory(_)
                | PrismError::InvalidConfig { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_error_is_validation() {
        let err = PrismError::Structure {
            path: PathBuf::from("/tmp"),
            segments: 1,
            required: 4,
        };
        assert!(err.is_validation());
        assert!(err.to_string().contains("at least 4 required"));
    }

    #[test]
    fn io_error_is_not_validation() {
        let err = PrismError::from(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        assert!(!err.is_validation());
    }
}
