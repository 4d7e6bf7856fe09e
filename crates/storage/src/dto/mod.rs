pub mod analysis;
pub mod common;
pub mod company;
pub mod promise_vote;
pub mod reputation;
pub mod review;
pub mod vote;
