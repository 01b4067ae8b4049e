pub mod auth_manager;
pub mod auth_manager_impl;

pub use auth_manager::*;
