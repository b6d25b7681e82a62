pub mod health;
pub mod offers;
pub mod providers;
