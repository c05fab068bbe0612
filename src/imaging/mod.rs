//! Image I/O boundary: loading targets and exporting rendered results.

mod export;
mod target;

pub use export::{ImageSaveError, save_image, show_image, to_gray_image};
pub use target::{ImageLoadError, load_target_image, resize_area};
