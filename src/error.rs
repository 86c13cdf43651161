use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub(crate) enum EnvError {
    #[error("no workspace folder at {}", .0.display())]
    NoWorkspace(PathBuf),

    #[error("no .env template found under {}", .0.display())]
    NoTemplateFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal: {0}")]
    Terminal(#[from] io::Error),

    #[error("editor: {0}")]
    Editor(String),
}

pub(crate) type Result<T> = std::result::Result<T, EnvError>;
