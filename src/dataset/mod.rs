mod dataset;
mod io;
mod kind;
mod survey;

pub use dataset::Dataset;
pub use kind::GeometryKind;
pub use survey::SurveyData;
