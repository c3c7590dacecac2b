use crate::util::Vec3D;
use crate::warn;
use std::f64::consts::PI;
use std::sync::OnceLock;

/// Discretization of a unit sphere into patches, each represented by its
/// outward unit normal.
///
/// Patches are laid out on a Fibonacci lattice, which spreads them almost
/// evenly so every patch stands for roughly the same surface area.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePatchSet {
    normals: Vec<Vec3D<f64>>,
}

/// Process-wide solar surface discretization.
static SOLAR_SURFACE: OnceLock<SurfacePatchSet> = OnceLock::new();

impl SurfacePatchSet {
    /// Builds a deterministic set of `count` patch normals.
    ///
    /// Normal `i` sits at height `1 - 2(i + 0.5)/count` and is rotated by the
    /// golden angle relative to its predecessor.
    pub fn build(count: usize) -> Self {
        let golden_ratio = (1.0 + 5.0_f64.sqrt()) / 2.0;
        #[allow(clippy::cast_precision_loss)]
        let n = count as f64;
        let normals = (0..count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let i_f = i as f64;
                let theta = 2.0 * PI * i_f / golden_ratio;
                let phi = (1.0 - 2.0 * (i_f + 0.5) / n).acos();
                Vec3D::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
            })
            .collect();
        Self { normals }
    }

    /// Shared patch set, built with `count` patches on the first call.
    ///
    /// Later calls return the same set whatever count they ask for, so
    /// observation fractions stay comparable for the whole run.
    pub fn shared(count: usize) -> &'static SurfacePatchSet {
        let set = SOLAR_SURFACE.get_or_init(|| Self::build(count));
        if set.len() != count {
            warn!("Solar surface already built with {} patches, ignoring request for {count}.", set.len());
        }
        set
    }

    /// Builds a set from explicit normals. Non-unit vectors are normalized,
    /// degenerate ones dropped.
    pub fn from_normals(normals: impl IntoIterator<Item = Vec3D<f64>>) -> Self {
        Self { normals: normals.into_iter().filter_map(Vec3D::try_normalize).collect() }
    }

    pub fn len(&self) -> usize { self.normals.len() }

    pub fn is_empty(&self) -> bool { self.normals.is_empty() }

    pub fn normals(&self) -> &[Vec3D<f64>] { &self.normals }
}
