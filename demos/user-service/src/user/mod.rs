pub mod controller;
pub mod model;
pub mod repository;

pub use controller::UserController;
pub use repository::{InMemoryUserRepository, UserRepository};
