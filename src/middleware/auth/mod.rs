pub mod permission;

pub use permission::protect;
