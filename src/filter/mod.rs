//! Per-pixel image filters.
//!
//! Filters are a closed set of variants matched exhaustively, each a
//! stateless single-pass transform applied in place. [`apply_all`] chains
//! them in order.

use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Errors from filter validation.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("intensity must be between 0 and 1, got {0}")]
    InvalidIntensity(f32),

    #[error("opacity must be between 0 and 1, got {0}")]
    InvalidOpacity(f32),
}

/// A single pixel filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Convert to grayscale by luminance. When `preserve_alpha` is false
    /// the alpha channel is replaced by the gray value too.
    Grayscale { preserve_alpha: bool },
    /// Blend each pixel's luminance toward a tint color. Intensity 0 is
    /// no effect, 1 is full tint.
    Tint { color: [u8; 3], intensity: f32 },
    /// Scale the alpha channel. 0 is fully transparent, 1 leaves the
    /// image unchanged.
    Opacity { opacity: f32 },
    /// Invert the color channels, and optionally alpha.
    Invert { invert_alpha: bool },
}

impl Filter {
    /// Check parameter bounds.
    pub fn validate(&self) -> Result<(), FilterError> {
        match *self {
            Self::Tint { intensity, .. } if !(0.0..=1.0).contains(&intensity) => {
                Err(FilterError::InvalidIntensity(intensity))
            }
            Self::Opacity { opacity } if !(0.0..=1.0).contains(&opacity) => {
                Err(FilterError::InvalidOpacity(opacity))
            }
            _ => Ok(()),
        }
    }

    /// Apply the filter to every pixel in place.
    pub fn apply(&self, image: &mut RgbaImage) -> Result<(), FilterError> {
        self.validate()?;
        match *self {
            Self::Grayscale { preserve_alpha } => {
                for pixel in image.pixels_mut() {
                    let gray = luma(pixel);
                    let alpha = if preserve_alpha { pixel[3] } else { gray };
                    *pixel = Rgba([gray, gray, gray, alpha]);
                }
            }
            Self::Tint { color, intensity } => {
                for pixel in image.pixels_mut() {
                    let lum = luma(pixel) as f32;
                    let blend = |tint: u8| -> u8 {
                        (lum * (1.0 - intensity) + tint as f32 * intensity).round() as u8
                    };
                    *pixel = Rgba([blend(color[0]), blend(color[1]), blend(color[2]), pixel[3]]);
                }
            }
            Self::Opacity { opacity } => {
                for pixel in image.pixels_mut() {
                    pixel[3] = (pixel[3] as f32 * opacity) as u8;
                }
            }
            Self::Invert { invert_alpha } => {
                for pixel in image.pixels_mut() {
                    let alpha = if invert_alpha {
                        255 - pixel[3]
                    } else {
                        pixel[3]
                    };
                    *pixel = Rgba([255 - pixel[0], 255 - pixel[1], 255 - pixel[2], alpha]);
                }
            }
        }
        Ok(())
    }
}

/// Integer luminance of a pixel.
fn luma(pixel: &Rgba<u8>) -> u8 {
    ((pixel[0] as u32 * 299 + pixel[1] as u32 * 587 + pixel[2] as u32 * 114) / 1000) as u8
}

/// Apply filters in sequence, stopping at the first invalid one.
pub fn apply_all(image: &mut RgbaImage, filters: &[Filter]) -> Result<(), FilterError> {
    for filter in filters {
        filter.apply(image)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255]))
    }

    #[test]
    fn test_grayscale_flattens_channels() {
        let mut image = test_image();
        Filter::Grayscale {
            preserve_alpha: true,
        }
        .apply(&mut image)
        .expect("apply");

        let pixel = image.get_pixel(0, 0);
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_grayscale_can_replace_alpha() {
        let mut image = test_image();
        Filter::Grayscale {
            preserve_alpha: false,
        }
        .apply(&mut image)
        .expect("apply");

        let pixel = image.get_pixel(0, 0);
        assert_eq!(pixel[3], pixel[0]);
    }

    #[test]
    fn test_tint_full_intensity_replaces_with_tint() {
        let mut image = test_image();
        Filter::Tint {
            color: [0, 0, 255],
            intensity: 1.0,
        }
        .apply(&mut image)
        .expect("apply");

        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_tint_zero_intensity_is_pure_luminance() {
        let mut image = test_image();
        Filter::Tint {
            color: [255, 0, 0],
            intensity: 0.0,
        }
        .apply(&mut image)
        .expect("apply");

        let pixel = image.get_pixel(0, 0);
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let mut image = test_image();
        Filter::Opacity { opacity: 0.5 }.apply(&mut image).expect("apply");
        assert_eq!(image.get_pixel(0, 0)[3], 127);
    }

    #[test]
    fn test_invert_flips_channels() {
        let mut image = test_image();
        Filter::Invert {
            invert_alpha: false,
        }
        .apply(&mut image)
        .expect("apply");

        assert_eq!(*image.get_pixel(0, 0), Rgba([55, 155, 205, 255]));
    }

    #[test]
    fn test_invert_alpha_optionally() {
        let mut image = test_image();
        Filter::Invert { invert_alpha: true }
            .apply(&mut image)
            .expect("apply");
        assert_eq!(image.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_validation_bounds() {
        assert!(Filter::Tint {
            color: [0, 0, 0],
            intensity: 1.5
        }
        .validate()
        .is_err());
        assert!(Filter::Opacity { opacity: -0.1 }.validate().is_err());
        assert!(Filter::Opacity { opacity: 1.0 }.validate().is_ok());
        assert!(Filter::Invert { invert_alpha: true }.validate().is_ok());
    }

    #[test]
    fn test_apply_all_chains_in_order() {
        let mut image = test_image();
        apply_all(
            &mut image,
            &[
                Filter::Grayscale {
                    preserve_alpha: true,
                },
                Filter::Opacity { opacity: 0.5 },
            ],
        )
        .expect("apply_all");

        let pixel = image.get_pixel(0, 0);
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[3], 127);
    }

    #[test]
    fn test_apply_all_stops_on_invalid_filter() {
        let mut image = test_image();
        let result = apply_all(
            &mut image,
            &[Filter::Opacity { opacity: 2.0 }, Filter::Invert {
                invert_alpha: false,
            }],
        );
        assert!(result.is_err());
        // The invalid filter ran first, so nothing was modified.
        assert_eq!(*image.get_pixel(0, 0), Rgba([200, 100, 50, 255]));
    }
}
