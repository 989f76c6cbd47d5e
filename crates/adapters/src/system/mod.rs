mod clock;
mod ids;
mod notifier;

pub use clock::SystemClock;
pub use ids::UuidIdGenerator;
pub use notifier::ConsoleNotifier;
