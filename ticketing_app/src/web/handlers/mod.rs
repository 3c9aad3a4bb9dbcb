// ticketing_app/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod catalog_handlers;
pub mod checkout_handlers;
pub mod order_handlers;
pub mod report_handlers;
