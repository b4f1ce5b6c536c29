//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `hardware`     | ActuatorPort       | relay, buzzer, servo, LEDs   |
//! | `log_sink`     | EventSink          | log output                   |
//! | `log_display`  | DisplayPort        | log output (LCD stand-in)    |
//! | `auth_store`   | AuthMarkerPort     | any StoragePort              |
//! | `memory_store` | StoragePort        | in-memory map                |
//! | `time`         | (clock)            | `std::time::Instant`         |

pub mod auth_store;
pub mod hardware;
pub mod log_display;
pub mod log_sink;
pub mod memory_store;
pub mod time;
