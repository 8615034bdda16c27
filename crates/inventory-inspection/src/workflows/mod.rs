pub mod inspection;
pub mod inventory;
