pub mod error;
pub mod merge;
pub mod options;
pub mod geometry;
pub mod layout;
pub mod surface;
pub mod painter;
pub mod input;
pub mod gesture;
pub mod coverage;
pub mod card;

// Re-export key types at crate root for convenience
pub use error::{Result, ScratchError};
pub use merge::Merge;
pub use options::{BrushInput, PartialOptions, ScratchOptions, ThresholdInput, DEFAULT_PERCENTAGE};
pub use geometry::{PixelRect, Size, ValidArea};
pub use layout::{Host, Layout};
pub use surface::{Brush, Composite, OverlaySurface, PixelSurface};
pub use input::{EventNames, PointerEvent, PointerFamily};
pub use gesture::{Gesture, GestureState};
pub use coverage::{erased_fraction, ALPHA_CHANNEL};
pub use card::{RenderState, Response, ScratchCard};
