pub mod catalog;
pub mod models;
pub mod server;
pub mod store;
pub mod storefront;
pub mod utils;
pub mod view;
