pub mod analysis;
pub mod prediction;
pub mod report;
