pub mod countries;
pub mod health;
