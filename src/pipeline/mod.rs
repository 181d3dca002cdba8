#[cfg(feature = "camera-nokhwa")]
pub mod camera;
#[cfg(feature = "camera-nokhwa")]
pub mod detector;
pub mod hud;
pub mod sink;
pub mod source;

// Re-exports for convenience
#[cfg(feature = "camera-nokhwa")]
pub use camera::CameraSource;
pub use hud::{FpsMeter, StatusLine};
pub use sink::{CommandSink, FallbackSink};
pub use source::{LandmarkSource, ReplaySource};
