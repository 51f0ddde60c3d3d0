pub mod deck;
pub use deck::*;

pub mod oracle;
pub use oracle::*;
