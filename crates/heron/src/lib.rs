pub mod agent;
pub mod conversation;
pub mod developer;
pub mod errors;
pub mod models;
pub mod providers;
pub mod stream;
pub mod systems;
