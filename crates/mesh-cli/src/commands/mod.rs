pub mod cloth;
pub mod color;
pub mod distances;
pub mod export;
pub mod info;
pub mod path;
