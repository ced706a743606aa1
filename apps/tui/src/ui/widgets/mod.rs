pub mod charts;
pub mod palette;
pub mod popup;
pub mod radar;
pub mod tables;
