mod pointer;
mod reader;

// Mock memory reader for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

pub use pointer::{ChainTarget, PointerChainWalker, PointerWidth};
pub use reader::ReadMemory;

#[doc(hidden)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
