pub mod code_scanning;
pub mod issues;
pub mod pulls;
pub mod repos;
pub mod search;
pub mod users;
