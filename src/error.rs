use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum G2koError {
    #[error("invalid KEGG organism code: {0:?}")]
    #[diagnostic(help("organism codes look like `eco`, `hsa` or `T00001`"))]
    InvalidOrganismCode(String),

    #[error("invalid KO identifier: {0:?}")]
    InvalidKoId(String),

    #[error("too many organisms: {count} (at most {max} per report)")]
    TooManyOrganisms { count: usize, max: usize },

    #[error("please enter at least one valid KEGG organism code")]
    NoOrganisms,

    #[error("missing config file g2ko.json in current directory")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("KEGG request failed: {0}")]
    KeggHttp(String),

    #[error("KEGG returned status {status}: {message}")]
    KeggStatus { status: u16, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
