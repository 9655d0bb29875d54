pub mod channel;
pub mod color;
pub mod error;
pub mod event;
pub mod history;
pub mod meter;
pub mod snapshot;

pub use channel::{ChannelDescriptor, ChannelKind, Interpolation};
pub use color::Color;
pub use error::{GaugeError, Result};
pub use event::Message;
pub use history::SampleHistory;
pub use meter::{Meter, SharedMeter};
pub use snapshot::SystemSnapshot;
