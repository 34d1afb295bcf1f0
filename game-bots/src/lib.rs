pub mod driver;
pub mod oracle;
pub mod roster;

// Re-export main components
pub use driver::*;
pub use oracle::*;
pub use roster::*;
