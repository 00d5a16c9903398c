use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to parse KDL")]
    #[diagnostic(code(hypr_ipc::config::parse_error))]
    ParseError {
        #[source_code]
        src: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source]
        source: kdl::KdlError,
    },

    #[error("Invalid value for `{key}`: expected {expected}")]
    #[diagnostic(code(hypr_ipc::config::invalid_value))]
    InvalidValue {
        key: String,
        expected: String,
        #[source_code]
        src: String,
        #[label("expected {expected}")]
        span: miette::SourceSpan,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(hypr_ipc::config::invalid))]
    Invalid { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
