/// Channel packing and unpacking between individual PBR maps and ORM textures.
use crate::error::PackerError;
use constants::naming::{AO_SUFFIX, METALLIC_SUFFIX, ROUGHNESS_SUFFIX, SMOOTHNESS_SUFFIX};
use constants::texture::{MAX_CHANNEL_VALUE, OPAQUE_ALPHA};
use image::{RgbImage, RgbaImage};
use rayon::prelude::*;
use serde::Serialize;

const RGB: usize = 3;
const RGBA: usize = 4;

/// Semantic meaning of a single grayscale channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChannelRole {
    AmbientOcclusion,
    Roughness,
    Smoothness,
    Metallic,
}

impl ChannelRole {
    /// Filename suffix used when the role is decomposed out of a packed texture.
    pub fn suffix(self) -> &'static str {
        match self {
            ChannelRole::AmbientOcclusion => AO_SUFFIX,
            ChannelRole::Roughness => ROUGHNESS_SUFFIX,
            ChannelRole::Smoothness => SMOOTHNESS_SUFFIX,
            ChannelRole::Metallic => METALLIC_SUFFIX,
        }
    }
}

impl std::fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChannelRole::AmbientOcclusion => "AO",
            ChannelRole::Roughness => "Roughness",
            ChannelRole::Smoothness => "Smoothness",
            ChannelRole::Metallic => "Metallic",
        };
        f.write_str(name)
    }
}

/// Assignment of roughness or smoothness to the green channel of an ORM texture.
/// R is always AO and B is always Metallic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrmConvention {
    /// R=AO, G=Roughness, B=Metallic.
    Unreal,
    /// R=AO, G=Smoothness, B=Metallic.
    Unity,
}

impl OrmConvention {
    pub fn from_unreal_flag(is_unreal: bool) -> Self {
        if is_unreal {
            OrmConvention::Unreal
        } else {
            OrmConvention::Unity
        }
    }
}

/// Microsurface value as supplied by the caller, either representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Microsurface {
    Roughness(u8),
    Smoothness(u8),
}

impl Microsurface {
    pub fn roughness(self) -> u8 {
        match self {
            Microsurface::Roughness(value) => value,
            Microsurface::Smoothness(value) => invert_roughness(value),
        }
    }

    pub fn smoothness(self) -> u8 {
        match self {
            Microsurface::Roughness(value) => invert_roughness(value),
            Microsurface::Smoothness(value) => value,
        }
    }

    /// Value for the green channel of the given convention.
    pub fn green_for(self, convention: OrmConvention) -> u8 {
        match convention {
            OrmConvention::Unreal => self.roughness(),
            OrmConvention::Unity => self.smoothness(),
        }
    }
}

/// Converts roughness to smoothness or back. The operation is its own inverse.
pub fn invert_roughness(value: u8) -> u8 {
    MAX_CHANNEL_VALUE - value
}

/// Packs the three material values into an RGB triple for the given convention.
pub fn pack_orm(ao: u8, surface: Microsurface, metallic: u8, convention: OrmConvention) -> [u8; 3] {
    [ao, surface.green_for(convention), metallic]
}

/// Re-expresses a packed pixel in the other convention. Only G changes.
pub fn convert_orm_convention(packed: [u8; 3], _from: OrmConvention) -> [u8; 3] {
    [packed[0], invert_roughness(packed[1]), packed[2]]
}

/// All four maps recoverable from one packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackedOrm {
    pub ao: u8,
    pub roughness: u8,
    pub smoothness: u8,
    pub metallic: u8,
}

impl UnpackedOrm {
    /// Metallic pixel carrying smoothness in alpha, as consumed by Unity's
    /// standard shader.
    pub fn metallic_with_smoothness(&self) -> [u8; 4] {
        [self.metallic, self.metallic, self.metallic, self.smoothness]
    }
}

/// Splits a packed pixel according to the declared convention.
pub fn unpack_orm(packed: [u8; 3], convention: OrmConvention) -> UnpackedOrm {
    let surface = match convention {
        OrmConvention::Unreal => Microsurface::Roughness(packed[1]),
        OrmConvention::Unity => Microsurface::Smoothness(packed[1]),
    };

    UnpackedOrm {
        ao: packed[0],
        roughness: surface.roughness(),
        smoothness: surface.smoothness(),
        metallic: packed[2],
    }
}

/// Individual AO, Roughness and Metallic maps of one material.
/// Grayscale values are read from the red channel of each map.
pub struct TextureSet {
    ao: RgbaImage,
    roughness: RgbaImage,
    metallic: RgbaImage,
}

impl TextureSet {
    /// Builds a set after checking every map against the AO resolution.
    pub fn new(
        ao: RgbaImage,
        roughness: RgbaImage,
        metallic: RgbaImage,
    ) -> Result<Self, PackerError> {
        let expected = ao.dimensions();
        for (role, map) in [
            (ChannelRole::Roughness, &roughness),
            (ChannelRole::Metallic, &metallic),
        ] {
            if map.dimensions() != expected {
                return Err(PackerError::DimensionMismatch {
                    role,
                    expected,
                    found: map.dimensions(),
                });
            }
        }

        Ok(Self {
            ao,
            roughness,
            metallic,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.ao.dimensions()
    }

    /// Packs the set into a single RGB texture in the given convention.
    pub fn pack(&self, convention: OrmConvention) -> RgbImage {
        let (width, height) = self.dimensions();
        let mut packed = RgbImage::new(width, height);

        packed
            .par_chunks_exact_mut(RGB)
            .zip(self.ao.par_chunks_exact(RGBA))
            .zip(self.roughness.par_chunks_exact(RGBA))
            .zip(self.metallic.par_chunks_exact(RGBA))
            .for_each(|(((out, ao), roughness), metallic)| {
                let surface = Microsurface::Roughness(roughness[0]);
                out.copy_from_slice(&pack_orm(ao[0], surface, metallic[0], convention));
            });

        packed
    }

    /// Copy of the Metallic map with alpha replaced by smoothness.
    /// RGB channels are left untouched.
    pub fn metallic_with_smoothness(&self) -> RgbaImage {
        let mut metallic = self.metallic.clone();

        metallic
            .par_chunks_exact_mut(RGBA)
            .zip(self.roughness.par_chunks_exact(RGBA))
            .for_each(|(out, roughness)| {
                out[3] = invert_roughness(roughness[0]);
            });

        metallic
    }
}

/// Converts a whole packed texture to the other convention.
pub fn convert_orm_texture(packed: &RgbImage, from: OrmConvention) -> RgbImage {
    let mut converted = packed.clone();

    converted.par_chunks_exact_mut(RGB).for_each(|pixel| {
        let value = convert_orm_convention([pixel[0], pixel[1], pixel[2]], from);
        pixel.copy_from_slice(&value);
    });

    converted
}

/// Grayscale maps decomposed from one packed texture.
pub struct DecomposedOrm {
    pub ao: RgbaImage,
    pub roughness: RgbaImage,
    pub smoothness: RgbaImage,
    /// Metallic in RGB, smoothness in alpha.
    pub metallic: RgbaImage,
}

impl DecomposedOrm {
    /// Maps paired with their roles, in the order they are written to disk.
    pub fn maps(&self) -> [(ChannelRole, &RgbaImage); 4] {
        [
            (ChannelRole::AmbientOcclusion, &self.ao),
            (ChannelRole::Roughness, &self.roughness),
            (ChannelRole::Smoothness, &self.smoothness),
            (ChannelRole::Metallic, &self.metallic),
        ]
    }
}

/// Decomposes a packed texture into individual maps.
pub fn unpack_orm_texture(packed: &RgbImage, convention: OrmConvention) -> DecomposedOrm {
    let (width, height) = packed.dimensions();
    let mut ao = RgbaImage::new(width, height);
    let mut roughness = RgbaImage::new(width, height);
    let mut smoothness = RgbaImage::new(width, height);
    let mut metallic = RgbaImage::new(width, height);

    ao.par_chunks_exact_mut(RGBA)
        .zip(roughness.par_chunks_exact_mut(RGBA))
        .zip(smoothness.par_chunks_exact_mut(RGBA))
        .zip(metallic.par_chunks_exact_mut(RGBA))
        .zip(packed.par_chunks_exact(RGB))
        .for_each(|((((ao, roughness), smoothness), metallic), pixel)| {
            let unpacked = unpack_orm([pixel[0], pixel[1], pixel[2]], convention);
            ao.copy_from_slice(&gray(unpacked.ao));
            roughness.copy_from_slice(&gray(unpacked.roughness));
            smoothness.copy_from_slice(&gray(unpacked.smoothness));
            metallic.copy_from_slice(&unpacked.metallic_with_smoothness());
        });

    DecomposedOrm {
        ao,
        roughness,
        smoothness,
        metallic,
    }
}

fn gray(value: u8) -> [u8; 4] {
    [value, value, value, OPAQUE_ALPHA]
}
