/// Below this a length or denominator is treated as zero.
pub const GEOMETRY_EPSILON: f32 = 1e-6;

/// sRGB encoded value at which the transfer curve switches to the power segment.
pub const SRGB_LINEAR_THRESHOLD: f32 = 0.04045;

/// Linear value at which the inverse transfer curve switches to the power segment.
pub const LINEAR_SRGB_THRESHOLD: f32 = 0.0031308;

/// Suffix width used when de-duplicating layer names (`Name.001`).
pub const NAME_SUFFIX_DIGITS: usize = 3;
