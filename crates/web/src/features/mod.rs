pub mod admin;
pub mod analysis;
pub mod companies;
pub mod promise_votes;
pub mod reputation;
pub mod reviews;
pub mod votes;
