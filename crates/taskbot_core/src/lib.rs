pub mod config;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod notify;
pub mod poller;
pub mod render;
pub mod session;
pub mod storage;
pub mod task_api;
pub mod telegram;
pub mod update;
