mod vec3d;

pub use vec3d::Vec3D;
