//! Embassy async tasks
//!
//! Timer-context tasks run on the interrupt executor and only touch
//! shared state and pins. Everything that talks to the host or logs
//! per event runs in thread mode.

pub mod actuation;
pub mod heartbeat;
pub mod host_link;

#[cfg(feature = "role-fog")]
pub mod fog;
#[cfg(feature = "role-radar")]
pub mod radar;

pub use actuation::tick_event_task;
pub use heartbeat::heartbeat_task;
pub use host_link::{host_link_task, host_uart};

#[cfg(feature = "role-fog")]
pub use fog::{distance_sample_task, fog_pass_task};
#[cfg(feature = "role-radar")]
pub use radar::{radar_rx_task, radar_uart, radar_watch_task};
