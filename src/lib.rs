//! delivery-routing core
//!
//! Collects shipping destinations from e-commerce order backends and
//! sequences them into a single delivery route using a nearest-neighbour
//! heuristic over great-circle distances.

pub mod stop;
pub mod haversine;
pub mod planner;
pub mod traits;
pub mod platform;
pub mod shopify;
pub mod shopee;
pub mod lazada;
pub mod tiktok;
pub mod export;
