pub mod card;
pub mod color;
pub mod deck;
pub mod inventory;

pub use card::*;
pub use color::*;
pub use deck::*;
pub use inventory::*;
