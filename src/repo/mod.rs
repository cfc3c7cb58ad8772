//! Repository layer: all persistence goes through these modules. Each write
//! validates and normalizes its input before touching the database.

pub mod tasks;
pub mod users;
