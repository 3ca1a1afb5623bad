pub mod handlers;
pub mod overview;
