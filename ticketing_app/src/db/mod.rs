// ticketing_app/src/db/mod.rs
pub mod postgres;
pub mod seed;

pub use postgres::PgStore;
