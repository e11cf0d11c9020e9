pub mod orbit;
pub mod panels;
pub mod plot;
