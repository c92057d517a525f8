//! 1-D resampling kernels used by the resize engine.
//!
//! A kernel is a support radius (in source-pixel units) and a weighting
//! function that is zero outside `[-support, support]`. The resize passes
//! gather every source tap within the scaled support and renormalize the
//! weights so they sum to 1, which keeps brightness stable at the image
//! edges.

use crate::error::TransformError;

/// A resampling kernel selector.
///
/// The set is closed apart from `Custom`, which lets callers plug in their
/// own weighting function without any global registration.
#[derive(Clone, Copy)]
pub enum ResampleKernel {
    /// Nearest neighbor. Support 0; the resizer uses a direct index path.
    Nearest,
    /// Box averaging. Equivalent to pixel mixing when minifying.
    Box,
    /// Triangle (bilinear) kernel.
    Linear,
    /// Catmull-Rom cubic spline.
    Cubic,
    /// Lanczos windowed sinc with a = 3.
    Lanczos,
    /// A caller-supplied kernel: support radius plus weighting function.
    Custom { support: f64, weight: fn(f64) -> f64 },
}

impl ResampleKernel {
    /// The distance beyond which the kernel weight is zero.
    pub fn support(&self) -> f64 {
        match self {
            ResampleKernel::Nearest => 0.0,
            ResampleKernel::Box => 0.5,
            ResampleKernel::Linear => 1.0,
            ResampleKernel::Cubic => 2.0,
            ResampleKernel::Lanczos => 3.0,
            ResampleKernel::Custom { support, .. } => *support,
        }
    }

    /// Kernel weight at the given distance from the sample center.
    pub fn weight(&self, distance: f64) -> f64 {
        let x = distance.abs();
        match self {
            ResampleKernel::Nearest => {
                if x < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            ResampleKernel::Box => {
                if x <= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            ResampleKernel::Linear => {
                if x < 1.0 {
                    1.0 - x
                } else {
                    0.0
                }
            }
            ResampleKernel::Cubic => {
                if x < 1.0 {
                    (1.5 * x - 2.5) * x * x + 1.0
                } else if x < 2.0 {
                    ((-0.5 * x + 2.5) * x - 4.0) * x + 2.0
                } else {
                    0.0
                }
            }
            ResampleKernel::Lanczos => {
                if x < 3.0 {
                    sinc(x) * sinc(x / 3.0)
                } else {
                    0.0
                }
            }
            ResampleKernel::Custom { support, weight } => {
                if x <= *support {
                    weight(distance)
                } else {
                    0.0
                }
            }
        }
    }

    /// Parse a kernel selector name as used by the CLI.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnsupportedKernel`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self, TransformError> {
        match name.to_ascii_lowercase().as_str() {
            "nearest" => Ok(ResampleKernel::Nearest),
            "box" => Ok(ResampleKernel::Box),
            "linear" | "bilinear" => Ok(ResampleKernel::Linear),
            "cubic" | "catmullrom" => Ok(ResampleKernel::Cubic),
            "lanczos" | "lanczos3" => Ok(ResampleKernel::Lanczos),
            other => Err(TransformError::UnsupportedKernel(other.to_string())),
        }
    }
}

impl std::fmt::Debug for ResampleKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResampleKernel::Nearest => "Nearest",
            ResampleKernel::Box => "Box",
            ResampleKernel::Linear => "Linear",
            ResampleKernel::Cubic => "Cubic",
            ResampleKernel::Lanczos => "Lanczos",
            ResampleKernel::Custom { .. } => "Custom",
        };
        f.write_str(name)
    }
}

/// Normalized sinc: sin(pi x) / (pi x).
fn sinc(x: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    let pi_x = std::f64::consts::PI * x;
    pi_x.sin() / pi_x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_is_one_at_center() {
        for kernel in [
            ResampleKernel::Box,
            ResampleKernel::Linear,
            ResampleKernel::Cubic,
            ResampleKernel::Lanczos,
        ] {
            assert!(
                (kernel.weight(0.0) - 1.0).abs() < 1e-12,
                "{kernel:?} center weight"
            );
        }
    }

    #[test]
    fn test_weight_zero_outside_support() {
        for kernel in [
            ResampleKernel::Box,
            ResampleKernel::Linear,
            ResampleKernel::Cubic,
            ResampleKernel::Lanczos,
        ] {
            let beyond = kernel.support() + 0.25;
            assert_eq!(kernel.weight(beyond), 0.0, "{kernel:?} beyond support");
            assert_eq!(kernel.weight(-beyond), 0.0, "{kernel:?} beyond support");
        }
    }

    #[test]
    fn test_weight_symmetry() {
        for kernel in [
            ResampleKernel::Linear,
            ResampleKernel::Cubic,
            ResampleKernel::Lanczos,
        ] {
            for d in [0.25, 0.5, 1.5, 2.5] {
                assert!(
                    (kernel.weight(d) - kernel.weight(-d)).abs() < 1e-12,
                    "{kernel:?} at {d}"
                );
            }
        }
    }

    #[test]
    fn test_cubic_zero_at_integer_offsets() {
        // Catmull-Rom interpolates: it must not pull in neighbors when the
        // sample lands exactly on a source pixel.
        assert!(ResampleKernel::Cubic.weight(1.0).abs() < 1e-12);
        assert!(ResampleKernel::Cubic.weight(2.0).abs() < 1e-12);
    }

    #[test]
    fn test_lanczos_zero_at_integer_offsets() {
        for d in [1.0, 2.0] {
            assert!(ResampleKernel::Lanczos.weight(d).abs() < 1e-12, "at {d}");
        }
    }

    #[test]
    fn test_custom_kernel() {
        fn tent(d: f64) -> f64 {
            1.0 - d.abs() / 2.0
        }
        let kernel = ResampleKernel::Custom {
            support: 2.0,
            weight: tent,
        };
        assert_eq!(kernel.support(), 2.0);
        assert!((kernel.weight(1.0) - 0.5).abs() < 1e-12);
        assert_eq!(kernel.weight(2.5), 0.0);
    }

    #[test]
    fn test_from_name() {
        assert!(matches!(
            ResampleKernel::from_name("Lanczos3"),
            Ok(ResampleKernel::Lanczos)
        ));
        assert!(matches!(
            ResampleKernel::from_name("box"),
            Ok(ResampleKernel::Box)
        ));
        assert!(matches!(
            ResampleKernel::from_name("gauss7"),
            Err(TransformError::UnsupportedKernel(_))
        ));
    }
}
