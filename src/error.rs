//! Error types for deteval.

/// Result type alias for deteval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for deteval.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// No date/time token could be extracted from a filename.
    #[error("no YYYYMMDD_HHMMSS token in filename '{name}'")]
    MalformedFilename {
        /// The offending file name.
        name: String,
    },

    /// No excerpt offset window could be extracted from a filename.
    #[error("no <label>-<start>ms-<end>ms offset token in filename '{name}'")]
    MalformedExcerptOffset {
        /// The offending file name.
        name: String,
    },

    /// Failed to read a prediction log file.
    #[error("failed to read prediction log '{path}'")]
    LogRead {
        /// Path to the log file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A prediction log ended or broke where a frame or class block was expected.
    #[error("truncated prediction log '{path}': {message}")]
    TruncatedLog {
        /// Path to the log file.
        path: std::path::PathBuf,
        /// Description of what was expected.
        message: String,
    },

    /// Vote aggregation was asked to summarize zero frames.
    #[error("cannot aggregate a class vote from an empty frame sequence")]
    EmptyVote,

    /// Failed to parse an annotation table.
    #[error("failed to parse annotation table '{path}'")]
    AnnotationParseFailed {
        /// Path to the annotation table.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid annotation table contents.
    #[error("invalid annotation table format: {message}")]
    InvalidAnnotationFormat {
        /// Description of the format error.
        message: String,
    },

    /// Failed to read a file map.
    #[error("failed to read file map '{path}'")]
    FileMapRead {
        /// Path to the file map.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a file map.
    #[error("failed to parse file map '{path}'")]
    FileMapParse {
        /// Path to the file map.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write a file map.
    #[error("failed to write file map '{path}'")]
    FileMapWrite {
        /// Path to the file map.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to read an evaluation results file.
    #[error("failed to read results file '{path}'")]
    ResultsRead {
        /// Path to the results file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid evaluation results contents.
    #[error("invalid results format: {message}")]
    InvalidResultsFormat {
        /// Description of the format error.
        message: String,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write output file '{path}'")]
    OutputWrite {
        /// Path to the output file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
