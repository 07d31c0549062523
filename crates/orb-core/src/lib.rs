pub mod burndown;
pub mod config;
pub mod feed;
pub mod metrics;
pub mod orb;
pub mod seed;
pub mod store;
pub mod types;
