pub mod cache;
pub mod clean;
pub mod load;
pub mod reshape;

pub use cache::SurveyCache;
pub use clean::{clean_table, CleanedRow, CleanedTable};
pub use load::{load_survey_bytes, load_survey_csv, LoadReport, Loaded, RawTable};
pub use reshape::{reshape, LongRecord};
