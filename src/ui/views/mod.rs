pub mod events;
pub mod message;

pub use events::draw_events;
pub use message::draw_message;
