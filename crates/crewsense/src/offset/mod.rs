mod cache;
mod hex;
#[cfg(feature = "api")]
mod loader;
mod scanner;
mod signature;
mod table;

pub use cache::*;
pub use hex::parse_hex;
#[cfg(feature = "api")]
pub use loader::*;
pub use scanner::*;
pub use signature::*;
pub use table::*;
