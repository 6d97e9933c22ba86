//! Manning roughness coefficients by pipe material.

use swi_core::Material;

/// Roughness used for any material not listed in [`MANNING_ROUGHNESS`].
pub const DEFAULT_MANNING_N: f64 = 0.013;

/// Manning's n per material. Ductile and cast iron span 0.012-0.014; the
/// cast iron value is used.
pub const MANNING_ROUGHNESS: [(Material, f64); 4] = [
    (Material::Concrete, 0.013),
    (Material::CastIron, 0.014),
    (Material::Pvc, 0.009),
    (Material::Earth, 0.025),
];

pub fn manning_n(material: Material) -> f64 {
    MANNING_ROUGHNESS
        .iter()
        .find(|(m, _)| *m == material)
        .map(|(_, n)| *n)
        .unwrap_or(DEFAULT_MANNING_N)
}
