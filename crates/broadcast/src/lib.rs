pub mod broadcaster;
pub mod config;
pub mod frame;

pub use broadcaster::Broadcaster;
pub use config::BroadcastConfig;
pub use frame::Frame;
