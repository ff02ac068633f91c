pub mod manager;

pub use manager::LevelManager;
