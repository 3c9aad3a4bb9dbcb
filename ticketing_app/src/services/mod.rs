// ticketing_app/src/services/mod.rs
pub mod cart_sessions;
pub mod image_fetcher;
