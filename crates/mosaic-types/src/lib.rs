pub mod display;
pub mod message;
pub mod thread;
pub mod view;

pub use display::{split_links, Segment};
pub use message::{new_id, Message};
pub use thread::Thread;
pub use view::ViewKind;

// Wire-level vocabulary shared with the client crate
pub use mosaic_client::{CanonicalMode, Role, ToolRecord};
