#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod page;
pub mod rest;
pub mod server;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use page::render_page;
pub use server::ApiServer;
pub use service::DashboardService;
