pub mod db_init;
pub mod itick;
pub mod user_store;

pub mod auth_service;
pub mod stocks_service;
