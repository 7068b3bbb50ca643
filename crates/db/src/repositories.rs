pub mod appointment;
pub mod catalog;
pub mod customer;
pub mod schedule;
