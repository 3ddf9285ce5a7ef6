pub use client::*;
pub use generate::*;
pub use predict::*;
pub use server::*;
pub use train::*;

pub mod client;
pub mod generate;
pub mod packet;
pub mod predict;
pub mod server;
pub mod train;
