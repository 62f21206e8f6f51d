// Controllers: one per entity, each operation returns a response envelope

pub mod user_controller;

pub use user_controller::UserController;
