pub mod application;
pub mod config;
pub mod content;
pub mod credentials;
pub mod error;
pub mod forms;
pub mod notification;
pub mod osia;
pub mod seeding;
pub mod telemetry;
pub mod translations;
