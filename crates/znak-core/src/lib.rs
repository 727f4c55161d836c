pub mod catalogue;
pub mod distance;
pub mod geometry;
pub mod lookup;
pub mod matcher;
pub mod settings;
pub mod sign;
pub mod taxonomy;
pub mod video;
