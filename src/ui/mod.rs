pub mod lunar;
pub mod panels;
pub mod plot;
pub mod table;
