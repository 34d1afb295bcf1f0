pub mod clue;
pub mod fallback;
pub mod randomizer;
pub mod session;
pub mod words;

// Re-export main components
pub use clue::*;
pub use fallback::*;
pub use randomizer::*;
pub use session::*;
pub use words::*;
