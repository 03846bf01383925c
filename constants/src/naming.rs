/// Filename keywords and output naming used across the packer.
/// Matching against keywords is always case-insensitive.

pub const ROUGHNESS_KEYWORD: &str = "roughness";
pub const METALLIC_KEYWORD: &str = "metallic";
pub const AO_KEYWORD: &str = "ao";
pub const ORM_KEYWORD: &str = "orm";

/// Names containing this were produced by the individual flow and are never
/// picked up again as packed inputs.
pub const ORM_UNITY_KEYWORD: &str = "ormunity";

/// Token replaced in the Metallic file stem to name packed outputs.
pub const METALLIC_STEM_TOKEN: &str = "Metallic";

/// Replacement for packed outputs in the Unreal convention.
pub const UNREAL_ORM_TOKEN: &str = "ormue";

/// Replacement for packed outputs in the Unity convention.
pub const UNITY_ORM_TOKEN: &str = "ormunity";

/// Suffix of a packed texture converted to the Unity convention.
pub const UNITY_SUFFIX: &str = "_unity";

pub const AO_SUFFIX: &str = "_AO";
pub const ROUGHNESS_SUFFIX: &str = "_Roughness";
pub const SMOOTHNESS_SUFFIX: &str = "_Smoothness";
pub const METALLIC_SUFFIX: &str = "_Metallic";

/// Case-insensitive substring test used for every role lookup.
pub fn name_contains(name: &str, keyword: &str) -> bool {
    name.to_lowercase().contains(&keyword.to_lowercase())
}
