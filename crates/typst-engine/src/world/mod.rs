//! Typst World implementation for in-memory report compilation

pub mod fonts;
pub mod virtual_world;

pub use fonts::FontCache;
pub use virtual_world::VirtualWorld;
