pub mod catalog_source;
pub mod clock_port;
pub mod notification_sender;
