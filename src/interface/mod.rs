pub mod controller;

pub use controller::{InterfaceController, Scenario};
