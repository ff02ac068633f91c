pub mod controller;
pub mod drift;
pub mod state;

pub use controller::{CollectOutcome, DataCollectionController};
pub use drift::{apply_drift, DriftRule, DriftSettings};
pub use state::{CollectionState, CollectionStatus};
