pub mod aggregate;
pub mod backup;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod milestone;
pub mod notification;
pub mod sound;
pub mod state;
pub mod storage;
pub mod structs;
pub mod tasks;
