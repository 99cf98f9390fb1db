//! Routed views, one per entry in the route table

pub mod password_generator;
pub mod password_manager;
pub mod user_auth;
pub mod user_profile;
