pub mod hashing;
pub mod store;
