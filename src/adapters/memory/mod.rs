pub mod catalog;
pub mod change_notifier;
pub mod customer_registry;
pub mod event_recorder;

pub use catalog::Catalog;
pub use change_notifier::ChangeNotifier;
pub use customer_registry::CustomerRegistry;
pub use event_recorder::EventRecorder;
