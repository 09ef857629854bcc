pub mod activities;
pub mod config;
pub mod db;
pub mod error;
pub mod links;
pub mod models;
pub mod participants;
pub mod routes;
pub mod services;
pub mod state;
pub mod trips;
pub mod validation;

#[cfg(test)]
mod test_support;
