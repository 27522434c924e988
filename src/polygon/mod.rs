pub mod client;

pub use client::PolygonClient;
