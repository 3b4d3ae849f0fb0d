// src/moodle/mod.rs

pub mod client;
pub mod grades;
pub mod request;
pub mod resolver;
pub mod roster;
pub mod types;

pub use client::MoodleClient;
pub use request::WsRequest;
