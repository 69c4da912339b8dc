pub mod assets;
pub mod camera;
pub mod controller;
pub mod marker;
pub mod picking;
pub mod prefabs;
pub mod selection;
pub mod view;

pub use view::*;
