// Skeleton data models

pub mod geometry;
pub mod joint;
pub mod posture;
pub mod statistics;

pub use geometry::*;
pub use joint::*;
pub use posture::*;
pub use statistics::*;
