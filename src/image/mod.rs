mod rgb;
pub use rgb::IntoArray3;

mod rgbd_image;
pub use rgbd_image::{RgbdFrame, RgbdImage};
