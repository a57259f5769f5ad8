//! Time-varying height surfaces

use kine_core::error::{ensure_finite, ensure_positive};
use kine_core::{Color, ConfigError, ConfigResult, Mesh, Vec3};

/// A square grid over `[-extent, extent]^2` displaced by a radial wave
/// `z = A * sin(k r - w t)`, where `r` is the distance from the z axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveSurface {
    resolution: usize,
    extent: f64,
    amplitude: f64,
    wavenumber: f64,
    angular_frequency: f64,
}

impl WaveSurface {
    /// `resolution` vertices per side (at least two)
    pub fn new(resolution: usize, extent: f64) -> ConfigResult<Self> {
        if resolution < 2 {
            return Err(ConfigError::NonPositiveCount {
                name: "surface resolution",
            });
        }
        Ok(Self {
            resolution,
            extent: ensure_positive("extent", extent)?,
            amplitude: 0.5,
            wavenumber: 2.0,
            angular_frequency: 2.0,
        })
    }

    pub fn with_wave(
        mut self,
        amplitude: f64,
        wavenumber: f64,
        angular_frequency: f64,
    ) -> ConfigResult<Self> {
        self.amplitude = ensure_finite("amplitude", amplitude)?;
        self.wavenumber = ensure_finite("wavenumber", wavenumber)?;
        self.angular_frequency = ensure_finite("angular_frequency", angular_frequency)?;
        Ok(self)
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Surface height above `(x, y)` at `time`
    pub fn height(&self, x: f64, y: f64, time: f64) -> f64 {
        let r = x.hypot(y);
        let z = self.amplitude * (self.wavenumber * r - self.angular_frequency * time).sin();
        if z.is_finite() {
            z
        } else {
            0.0
        }
    }

    /// Grid coordinate of vertex `index` along one side
    fn coordinate(&self, index: usize) -> f64 {
        let step = 2.0 * self.extent / (self.resolution - 1) as f64;
        -self.extent + step * index as f64
    }

    /// Row-major mesh of the surface at `time`
    pub fn mesh(&self, time: f64, color: Color) -> Mesh {
        let n = self.resolution;
        let mut vertices = Vec::with_capacity(n * n);
        for row in 0..n {
            let y = self.coordinate(row);
            for col in 0..n {
                let x = self.coordinate(col);
                vertices.push(Vec3::new(x, y, self.height(x, y, time)));
            }
        }
        Mesh {
            rows: n,
            cols: n,
            vertices,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_covers_extent() {
        let surface = WaveSurface::new(11, 2.0).unwrap();
        let mesh = surface.mesh(0.0, Color::WHITE);
        assert_eq!(mesh.vertices.len(), 121);
        let first = mesh.vertex(0, 0).unwrap();
        let last = mesh.vertex(10, 10).unwrap();
        assert_eq!((first.x, first.y), (-2.0, -2.0));
        assert!((last.x - 2.0).abs() < 1e-12 && (last.y - 2.0).abs() < 1e-12);
        let center = mesh.vertex(5, 5).unwrap();
        assert!(center.x.abs() < 1e-12 && center.y.abs() < 1e-12);
    }

    #[test]
    fn test_height_moves_with_time() {
        let surface = WaveSurface::new(5, 1.0).unwrap().with_wave(1.0, 1.0, 1.0).unwrap();
        assert!((surface.height(1.0, 0.0, 0.0) - 1f64.sin()).abs() < 1e-12);
        assert!(surface.height(1.0, 0.0, 1.0).abs() < 1e-12);
        assert_ne!(surface.mesh(0.0, Color::WHITE), surface.mesh(0.5, Color::WHITE));
    }

    #[test]
    fn test_heights_bounded_by_amplitude() {
        let surface = WaveSurface::new(21, 3.0).unwrap().with_wave(0.25, 3.0, 2.0).unwrap();
        for v in surface.mesh(1.7, Color::WHITE).vertices {
            assert!(v.z.abs() <= 0.25 + 1e-12);
        }
    }

    #[test]
    fn test_invalid_surface() {
        assert!(WaveSurface::new(1, 1.0).is_err());
        assert!(WaveSurface::new(10, 0.0).is_err());
        assert!(WaveSurface::new(10, 1.0).unwrap().with_wave(f64::NAN, 1.0, 1.0).is_err());
    }
}
