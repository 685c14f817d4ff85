pub mod decision;
pub mod event;
pub mod model;
pub mod notification;
pub mod ports;
pub mod service;
