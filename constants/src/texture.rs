/// Largest value an 8-bit channel can hold. Inversion is `MAX_CHANNEL_VALUE - v`.
pub const MAX_CHANNEL_VALUE: u8 = 255;

/// Alpha written into decomposed grayscale maps that carry no side channel.
pub const OPAQUE_ALPHA: u8 = MAX_CHANNEL_VALUE;

/// Extensions the batch can search for and write.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "exr"];
