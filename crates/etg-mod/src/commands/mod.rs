mod config;
mod frames;
mod ids;
mod map;
mod resolve;

pub use config::show_config;
pub use frames::{show_frames, FramesArgs};
pub use ids::{check_ids, IdsArgs};
pub use map::{show_map, MapArgs};
pub use resolve::{resolve_path, ResolveArgs};
