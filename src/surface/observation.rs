use super::SurfacePatchSet;
use crate::util::Vec3D;
use crate::warn;
use bitvec::{bitbox, boxed::BitBox, order::Lsb0};
use std::f64::consts::PI;
use strum_macros::Display;

/// Geometry problems that prevent an observation from being evaluated.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// The observer coincides with the star or has no finite position.
    DegenerateObserver,
    /// None of the given observers could be evaluated.
    NoUsableObserver,
    /// The patch set has no patches to observe.
    EmptyPatchSet,
}

impl std::error::Error for GeometryError {}

/// Union of the surface patches seen by a group of observers.
///
/// One bit per patch of the observed [`SurfacePatchSet`], set once any
/// observer has the patch inside its observation cap. Overlapping caps thus
/// never count a patch twice.
#[derive(Clone, Debug)]
pub struct ObservedSurface<'a> {
    /// Patches of the observed body.
    patches: &'a SurfacePatchSet,
    /// Half-angle of an observer's cap in radians.
    min_angle: f64,
    /// Seen patches, indexed like `patches`.
    seen: BitBox<usize, Lsb0>,
}

impl<'a> ObservedSurface<'a> {
    /// Creates an unobserved surface.
    ///
    /// # Errors
    /// * `EmptyPatchSet` if there is nothing to observe.
    pub fn new(patches: &'a SurfacePatchSet, min_angle: f64) -> Result<Self, GeometryError> {
        if patches.is_empty() {
            return Err(GeometryError::EmptyPatchSet);
        }
        Ok(Self { patches, min_angle, seen: bitbox![usize, Lsb0; 0; patches.len()] })
    }

    /// Unit direction from the star's center to the observer.
    ///
    /// # Errors
    /// * `DegenerateObserver` if the observer sits in the star's center or
    ///   either position is not finite.
    pub fn observer_direction(star: Vec3D<f64>, observer: Vec3D<f64>) -> Result<Vec3D<f64>, GeometryError> {
        star.to(&observer).try_normalize().ok_or(GeometryError::DegenerateObserver)
    }

    /// Marks every patch within `min_angle` of the observer's sub-point as seen.
    ///
    /// # Errors
    /// * `DegenerateObserver`, see [`ObservedSurface::observer_direction`].
    pub fn observe_from(&mut self, star: Vec3D<f64>, observer: Vec3D<f64>) -> Result<(), GeometryError> {
        let direction = Self::observer_direction(star, observer)?;
        if self.min_angle <= 0.0 {
            return Ok(());
        }
        if self.min_angle >= PI {
            self.seen.fill(true);
            return Ok(());
        }
        let min_cos = self.min_angle.cos();
        for (i, normal) in self.patches.normals().iter().enumerate() {
            if normal.dot(direction) >= min_cos {
                self.seen.set(i, true);
            }
        }
        Ok(())
    }

    /// Number of patches seen by at least one observer.
    pub fn seen_patches(&self) -> usize { self.seen.count_ones() }

    /// Fraction of the surface seen by at least one observer, in `[0, 1]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn coverage(&self) -> f64 { self.seen_patches() as f64 / self.seen.len() as f64 }
}

/// Computes the fraction of a star's surface visible to at least one observer.
///
/// Observers that coincide with the star are skipped with a warning.
///
/// # Errors
/// * `EmptyPatchSet` if `patches` is empty.
/// * `NoUsableObserver` if no observer could be evaluated.
pub fn visible_surface(
    observers: &[Vec3D<f64>],
    star: Vec3D<f64>,
    min_angle: f64,
    patches: &SurfacePatchSet,
) -> Result<f64, GeometryError> {
    let mut surface = ObservedSurface::new(patches, min_angle)?;
    let mut usable = 0;
    for observer in observers {
        match surface.observe_from(star, *observer) {
            Ok(()) => usable += 1,
            Err(e) => warn!("Skipping observer at {observer} for star at {star}: {e}"),
        }
    }
    if usable == 0 {
        return Err(GeometryError::NoUsableObserver);
    }
    Ok(surface.coverage())
}
