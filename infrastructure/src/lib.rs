#![allow(clippy::missing_docs_in_private_items)]

pub mod boundary;
pub mod clients;
pub mod services;


pub use boundary::{classify, guard};
pub use services::InfrastructureServices;
