pub mod account;
pub mod admin;
pub mod application;
pub mod auth;
pub mod info;
pub mod message;
pub mod review;
pub mod root;
pub mod token;
