mod aggregate;
mod report;

pub use aggregate::*;
pub use report::*;
