#[cfg(feature = "async-tokio")]
mod channel;
mod interface;
mod memory;

#[cfg(feature = "async-tokio")]
pub use channel::*;
pub use interface::*;
pub use memory::*;
