#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod errors;
pub mod resources;
pub mod scene;
pub mod utils;
pub mod viewer;

pub use animation::{Easing, PositionTween, TweenScheduler};
pub use assets::GltfLoader;
pub use errors::{Result, ShowroomError};
pub use resources::{BoundingBox, Geometry, Material, MaterialData, Mesh};
pub use scene::{Node, NodeHandle, Scene, Transform};
pub use viewer::{ClassifierConfig, Finish, ViewFlags, ViewPreset, Viewer, ViewerConfig, WheelGroup};
