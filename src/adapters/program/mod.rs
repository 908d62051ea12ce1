pub mod summary;

pub use summary::SummaryProgramBuilder;
