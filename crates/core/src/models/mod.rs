pub mod appointment;
pub mod business;
pub mod notification;
pub mod service;
pub mod staff;
