pub mod chat;
pub mod doctor;
pub mod history;
pub mod init;
pub mod tools;
