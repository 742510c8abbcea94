use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {input}: {error}")]
    Io {
        input: String,
        #[source]
        error: std::io::Error,
    },

    #[error("malformed CSV in {input}: {error}")]
    Csv {
        input: String,
        #[source]
        error: csv::Error,
    },

    #[error("{input} has no `{column}` column")]
    MissingColumn { input: String, column: String },

    #[error("{input} line {line}: unparsable date {value:?}")]
    InvalidDate {
        input: String,
        line: u64,
        value: String,
    },
}
