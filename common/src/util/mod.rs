pub mod common_utils;
pub mod date_util;
pub mod jwt;
pub mod log_util;
