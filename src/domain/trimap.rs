// ============================================================
// Layer 3 - Trimap Conventions
// ============================================================
// A trimap marks every pixel of an image as one of:
//   0   - definite background
//   128 - unknown (the band around the object boundary)
//   255 - definite foreground
//
// Matting error metrics are normalised by the size of the
// unknown band, so these values are shared by the data loader
// and the metric functions.

/// Trimap value for definite background pixels.
pub const BACKGROUND: u8 = 0;

/// Trimap value for the uncertain band the network has to resolve.
pub const UNKNOWN: u8 = 128;

/// Trimap value for definite foreground pixels.
pub const FOREGROUND: u8 = 255;

/// The three regions a trimap pixel can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimapRegion {
    Background,
    Unknown,
    Foreground,
}

impl TrimapRegion {
    /// Classify a raw trimap value.
    ///
    /// Only the exact sentinel 128 counts as unknown. Anything else
    /// below it is background, anything above it foreground, which
    /// matches how resized trimaps are usually re-thresholded.
    pub fn of(value: u8) -> Self {
        match value {
            UNKNOWN => TrimapRegion::Unknown,
            v if v < UNKNOWN => TrimapRegion::Background,
            _ => TrimapRegion::Foreground,
        }
    }
}

/// Number of pixels in the unknown band of a raw trimap buffer.
pub fn unknown_pixel_count(trimap: &[u8]) -> usize {
    trimap
        .iter()
        .filter(|&&v| TrimapRegion::of(v) == TrimapRegion::Unknown)
        .count()
}
