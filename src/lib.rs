pub mod error;
pub mod quarter;
pub mod survey;

pub use error::{Result, SurveyError};
pub use quarter::Quarter;
