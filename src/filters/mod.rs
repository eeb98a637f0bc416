//! # Filter Primitives
//!
//! The numeric building blocks shared by the style pipelines. Every function
//! here is pure: it borrows its input buffers and returns a new one.
//!
//! - [`color`]: grayscale, YCrCb planes, histogram equalization, tone mapping
//! - [`smoothing`]: Gaussian, bilateral and median filters
//! - [`edges`]: 3x3 convolution, Sobel, Canny, adaptive thresholding
//! - [`blend`]: weighted sums and masking

pub mod blend;
pub mod color;
pub mod edges;
pub mod smoothing;

pub use blend::{add_weighted, and_not_mask};
pub use color::{equalize_histogram, gray_to_rgb, quantize, rgb_to_gray, rgb_to_ycrcb, scale_abs, ycrcb_to_rgb, YCrCb};
pub use edges::{adaptive_threshold_mean, canny, convolve3x3, SHARPEN_KERNEL};
pub use smoothing::{bilateral_filter, gaussian_blur, median_filter};
