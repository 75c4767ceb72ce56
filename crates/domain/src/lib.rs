#![forbid(unsafe_code)]

pub mod alert;
pub mod catalog;
pub mod common;
pub mod crossmatch;
pub mod enrich;
pub mod filter;
pub mod notify;
pub mod photometry;
pub mod skycoord;
