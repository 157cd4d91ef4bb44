pub mod cli;
pub mod error;
pub mod generate;
pub mod git;
pub mod model;
pub mod report;
pub mod schedule;
pub mod writer;
