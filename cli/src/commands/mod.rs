pub mod explore;
pub mod render;
pub mod report;
