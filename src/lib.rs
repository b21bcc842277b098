//! Reviews feed core.
//!
//! Headless core of a paginated, infinitely-scrolling review list:
//!
//! - `state`: the list store (paging, single-flight loads, expand command)
//! - `view_state`: cell layout, text measurement and the row-height index
//! - `image_cache`: memory + disk + network image resolution
//! - `provider`: page sources (HTTP, file, in-memory)
//!
//! `config` and `logging` serve the `reviews-feed` binary.

pub mod config;
pub mod image_cache;
pub mod logging;
pub mod model;
pub mod provider;
pub mod state;
pub mod view_state;
