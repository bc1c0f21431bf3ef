pub mod bracket;
pub mod standings;
pub mod theme;
