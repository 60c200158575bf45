pub mod auth;
pub mod client;
pub mod cutting_order;
pub mod dashboard;
pub mod fabric;
pub mod order_item;
pub mod trash;
