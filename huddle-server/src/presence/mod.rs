mod presence_publisher;

pub use presence_publisher::*;
