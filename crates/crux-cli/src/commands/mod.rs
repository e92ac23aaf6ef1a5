pub mod account;
pub mod context;
pub mod output;
pub mod routes;
pub mod settings;
