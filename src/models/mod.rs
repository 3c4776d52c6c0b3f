pub mod document;
pub mod question;
pub mod quiz_config;
