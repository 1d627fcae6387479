use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("no candidate encoding could decode {origin}: tried {attempted:?}")]
    Decode {
        origin: String,
        attempted: Vec<&'static str>,
    },

    #[error("table has {columns} column(s); need at least quintile and category")]
    MalformedTable { columns: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SurveyError>;
