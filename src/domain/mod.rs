//! Domain values shared by the fetcher, renderer and controller.

pub mod address;
pub mod offer;
