pub mod handlers;
pub mod sentiment;
pub mod submission;
