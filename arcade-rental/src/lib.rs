pub mod ledger;
pub mod lifecycle;
pub mod models;
pub mod notifier;
pub mod registry;

pub use ledger::{RentalError, RentalStore};
pub use lifecycle::{LifecyclePolicy, SweepOutcome};
pub use models::{Booking, BookingStatus, NewBooking, RentalSummary, Unit, UnitStatus, UnitType};
pub use notifier::{Notifier, RecordingNotifier};
pub use registry::UnitRegistry;
