//! The `taskman` library crate.
//!
//! A task-manager REST API: account signup/login with bearer-token sessions,
//! profile and avatar management, per-user task CRUD, and fire-and-forget
//! email notifications on account lifecycle events. This crate holds the
//! domain models, authentication, repositories, routing, and error handling;
//! the binary (`main.rs`) wires them into an Actix Web server.

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod repo;
pub mod routes;
