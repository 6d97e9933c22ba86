use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipe wall material, as far as roughness is concerned.
///
/// Ductile and cast iron share one category. Anything not recognised maps to
/// [`Material::Unrecognized`], which gets the default roughness.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Concrete,
    CastIron,
    Pvc,
    Earth,
    Unrecognized,
}

impl Material {
    /// Parse a free-text material name. Case and surrounding whitespace are
    /// ignored; the Chinese names used by existing data sets are accepted.
    pub fn parse(raw: &str) -> Material {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "concrete" | "rcp" | "混凝土" => Material::Concrete,
            "cast_iron" | "ductile_iron" | "iron" | "di" | "ci" | "鑄鐵" | "球墨鑄鐵" => {
                Material::CastIron
            }
            "pvc" | "upvc" => Material::Pvc,
            "earth" | "earthen" | "土" => Material::Earth,
            _ => Material::Unrecognized,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Material::Concrete => "concrete",
            Material::CastIron => "cast_iron",
            Material::Pvc => "pvc",
            Material::Earth => "earth",
            Material::Unrecognized => "unrecognized",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::Material;

    #[test]
    fn parses_known_names() {
        assert_eq!(Material::parse("Concrete"), Material::Concrete);
        assert_eq!(Material::parse("ductile_iron"), Material::CastIron);
        assert_eq!(Material::parse("Cast Iron"), Material::CastIron);
        assert_eq!(Material::parse("鑄鐵"), Material::CastIron);
        assert_eq!(Material::parse("PVC"), Material::Pvc);
        assert_eq!(Material::parse("earth"), Material::Earth);
        assert_eq!(Material::parse("混凝土"), Material::Concrete);
    }

    #[test]
    fn unknown_names_are_unrecognized() {
        assert_eq!(Material::parse("vitrified clay"), Material::Unrecognized);
        assert_eq!(Material::parse(""), Material::Unrecognized);
    }
}
