//! Read-only queries for computer players, and a simple bot built on them.

mod threat;
mod production;
mod scoring;
mod utils;
pub mod bot;
pub use self::threat::*;
pub use self::production::*;
pub use self::scoring::*;
pub use self::utils::*;
