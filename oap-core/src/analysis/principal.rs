//! Principal component and ellipse fit
//!
//! The central second moments of the foreground pixels form a symmetric
//! 2x2 matrix whose eigen-decomposition has a closed form. The eigenvector
//! of the larger eigenvalue gives the particle orientation; the eigenvalue
//! pair gives the axis lengths of a fitted ellipse, which is rasterized
//! back over the grid to score how elliptical the particle is.

use crate::format::SLICE_WIDTH;
use crate::image::ParticleImage;

/// Axis lengths are floored to this value to keep ratios finite
const AXIS_EPSILON: f64 = 1e-7;

/// Result of the principal component fit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrincipalComponents {
    /// Share of ellipse/foreground agreement: hits / (hits + mismatches)
    pub hit_ratio: f32,
    /// Major over minor axis length
    pub axis_ratio: f32,
    /// Rotation of the major axis in degrees
    pub alpha: f32,
}

/// Fit principal components and an ellipse to the foreground pixels
///
/// Every nonzero cell counts as foreground, unweighted. Returns `None` for
/// images without foreground pixels.
pub fn principal_components(image: &ParticleImage) -> Option<PrincipalComponents> {
    let height = image.height();
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    let mut sum_xy = 0.0;
    let mut pixels = 0.0;

    for y in 0..height {
        for x in 0..SLICE_WIDTH {
            if image.get(x, y) != 0 {
                let (fx, fy) = (x as f64, y as f64);
                sum_x += fx;
                sum_y += fy;
                sum_xx += fx * fx;
                sum_yy += fy * fy;
                sum_xy += fx * fy;
                pixels += 1.0;
            }
        }
    }
    if pixels == 0.0 {
        return None;
    }

    let x_bary = sum_x / pixels;
    let y_bary = sum_y / pixels;

    let var_x = sum_xx / pixels - x_bary * x_bary;
    let var_y = sum_yy / pixels - y_bary * y_bary;
    let cov_xy = sum_xy / pixels - x_bary * y_bary;

    let discriminant = (var_x - var_y) * (var_x - var_y) + 4.0 * cov_xy * cov_xy;
    let sqrt_discr = discriminant.sqrt();

    let mut lambda_plus = ((var_x + var_y) + sqrt_discr) / 2.0;
    let mut lambda_minus = ((var_x + var_y) - sqrt_discr) / 2.0;

    // Eigenvector of the larger eigenvalue, parallel to the longest axis.
    let mut x_parallel = var_x + cov_xy - lambda_minus;
    let mut y_parallel = var_y + cov_xy - lambda_minus;
    let norm = (x_parallel * x_parallel + y_parallel * y_parallel).sqrt();
    if norm != 0.0 {
        x_parallel /= norm;
        y_parallel /= norm;
    }

    if lambda_plus < 0.0 {
        lambda_plus = 0.0;
    }
    if lambda_minus < 0.0 {
        lambda_minus = 0.0;
    }

    let major_axis = (2.0 * lambda_plus.sqrt()).max(AXIS_EPSILON);
    let minor_axis = (2.0 * lambda_minus.sqrt()).max(AXIS_EPSILON);

    // Degenerate eigenvectors fall back to a vertical orientation.
    let alpha = if x_parallel != 0.0 {
        (y_parallel / x_parallel).atan()
    } else {
        90.0_f64.to_radians()
    };
    let cos_alpha = alpha.cos();
    let sin_alpha = alpha.sin();

    let a = major_axis * major_axis;
    let b = minor_axis * minor_axis;

    let mut hits = 0u32;
    let mut misses = 0u32;

    for y in 0..height {
        for x in 0..SLICE_WIDTH {
            let dx = x as f64 - x_bary;
            let dy = y as f64 - y_bary;
            let u = cos_alpha * dx + sin_alpha * dy;
            let v = sin_alpha * dx - cos_alpha * dy;
            let inside = (u * u) / a + (v * v) / b <= 1.0;
            let foreground = image.get(x, y) != 0;

            if inside && foreground {
                hits += 1;
            } else if inside || foreground {
                misses += 1;
            }
        }
    }

    Some(PrincipalComponents {
        hit_ratio: (hits as f64 / (hits + misses) as f64) as f32,
        axis_ratio: (major_axis / minor_axis) as f32,
        alpha: alpha.to_degrees() as f32,
    })
}
