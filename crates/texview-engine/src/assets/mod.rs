//! Image resources.
//!
//! A [`Bundle`] resolves image identifiers to encoded bytes; [`load_image`]
//! decodes them into tightly packed RGBA8 ready for texture upload.

mod bundle;
mod decode;

pub use bundle::{Bundle, ASSETS_ENV, IMAGE_EXTENSIONS};
pub use decode::{decode_image, load_image, ImageData};
