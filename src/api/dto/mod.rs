pub mod login;
pub mod messages;
