pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod hooks;
pub mod integration;
pub mod providers;
pub mod repository;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
