/// API route modules
pub mod health;
