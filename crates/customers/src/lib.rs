//! Customers domain module: user profiles and their saved addresses.

pub mod address;
pub mod customer;

pub use address::{Address, BusinessDetails};
pub use customer::Customer;
