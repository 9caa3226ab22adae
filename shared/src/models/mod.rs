//! Domain models for the Stock Tracker

mod activity;
mod inward;
mod item;
mod outward;
mod party;
mod report;
mod stock;
mod user;

pub use activity::*;
pub use inward::*;
pub use item::*;
pub use outward::*;
pub use party::*;
pub use report::*;
pub use stock::*;
pub use user::*;
