pub mod finances;
pub mod health;
pub mod it;
pub mod me;
pub mod session;
