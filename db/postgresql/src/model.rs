pub mod activity_log;
pub mod application;
pub mod message;
pub mod session;
pub mod user;
