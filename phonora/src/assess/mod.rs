pub mod align;
pub mod assessor;
pub mod classify;
