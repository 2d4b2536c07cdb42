pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod pointer;
pub mod pulse;
pub mod resources;
pub mod session;
pub mod spring;
pub mod state;
pub mod strand;
pub mod visibility;

pub use config::*;
pub use error::ConfigError;
pub use geometry::*;
pub use palette::*;
pub use pointer::*;
pub use pulse::*;
pub use resources::*;
pub use session::*;
pub use spring::*;
pub use state::*;
pub use strand::*;
pub use visibility::*;

// Shaders bundled as string constants
pub static TUBE_WGSL: &str = include_str!("../shaders/tube.wgsl");
pub static RING_WGSL: &str = include_str!("../shaders/ring.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");
