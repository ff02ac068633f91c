pub mod controller;

pub use controller::{render_report, DecisionSupportController};
