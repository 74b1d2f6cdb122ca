//! HTTP Routes

pub mod eda;
pub mod requests;
pub mod system;
