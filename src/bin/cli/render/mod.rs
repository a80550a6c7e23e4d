pub mod table;
pub mod terminal;
