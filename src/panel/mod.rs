pub mod core;

pub use self::core::{GeocodePanel, ListenerHandle, NumberField, StatusPanel, TextField};
