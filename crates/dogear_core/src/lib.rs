pub mod bookmark;
pub mod codec;
pub mod commands;
pub mod config;
pub mod console;
pub mod name;
pub mod runtime;
pub mod storage;
