pub mod bits;
pub mod constants;
pub mod error;
pub mod io;
pub mod memory;
pub mod policy;
pub mod queue;
pub mod sim;
pub mod swap;
pub mod table;
pub mod translation;

// Re-export commonly used items for convenience
pub use error::SimError;
pub use policy::Algorithm;
pub use sim::{run, SimOptions, Simulation};
pub use swap::SwapStore;
pub use table::TableKind;
pub use translation::VirtualAddress;
