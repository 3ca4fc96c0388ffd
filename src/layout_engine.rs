mod direction;
mod engine;
mod floating;
mod free;
mod proxy;
mod rect_cache;
mod registry;
mod stack;

pub use direction::{Direction, Edges, Orientation};
pub use engine::{CustomAction, EngineIdentity, LayoutEngine};
pub use free::FreeEngine;
pub use proxy::FloatingProxyEngine;
pub use rect_cache::RectCacheEngine;
pub use registry::FloatingRegistry;
pub use stack::StackEngine;
