pub mod bus;
pub mod messages;

pub use bus::BroadcastEventBus;
pub use messages::UserEventMessage;
