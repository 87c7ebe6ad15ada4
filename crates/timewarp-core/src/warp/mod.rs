//! Timeline simulation: the due-date transform and the occurrence forecast.

mod params;
mod projector;
mod transform;

pub use params::{
    TransformParameters, DEFAULT_HORIZON_FUTURE, DEFAULT_HORIZON_PAST, SHIFT_MAX, SHIFT_MIN,
    STRETCH_MAX, STRETCH_MIN,
};
pub use projector::{
    forecast, project, project_one, reduce, DueMatrix, DueRow, Histogram, Schedulable, Window,
};
pub use transform::{stretch_delta, transform, transform_one, warp_delta, TransformedItem};
