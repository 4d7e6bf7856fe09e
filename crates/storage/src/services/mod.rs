pub mod aggregation;
pub mod contributions;
pub mod heuristics;
pub mod reputation;
pub mod trending;
