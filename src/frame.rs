use ndarray::Array3;

/// One decoded video frame, HWC layout (rows, columns, channels).
///
/// Decoding and color conversion happen upstream; the tracker only needs the
/// pixel buffer and the frame dimensions for the in-bounds policy.
pub struct Frame {
    pixels: Array3<u8>,
    pub timestamp: f32, // in seconds
}

impl Frame {
    pub fn new(pixels: Array3<u8>, timestamp: f32) -> Self {
        Self { pixels, timestamp }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.shape()[1] as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.shape()[0] as u32
    }

    #[inline]
    pub fn dims(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn pixels(&self) -> &Array3<u8> {
        &self.pixels
    }

    /// An empty frame is a hard precondition failure for every per-frame
    /// operation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.shape().iter().any(|&d| d == 0)
    }
}
