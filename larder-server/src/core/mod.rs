//! Core Module
//!
//! 配置、状态和服务器生命周期

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{Server, build_app};
pub use state::ServerState;
