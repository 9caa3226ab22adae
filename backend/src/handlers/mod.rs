//! HTTP handlers

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod items;
pub mod parties;
pub mod reports;
pub mod stock;
pub mod users;
