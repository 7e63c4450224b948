//! Decoded images and ordered image sets.

use image::{DynamicImage, GenericImageView};

/// A decoded raster handed between pipeline stages.
///
/// An image is either valid (it owns a pixel buffer) or an invalid placeholder
/// that records why decoding failed. Placeholders keep an [`ImageSet`] aligned
/// with the inputs that produced it.
#[derive(Debug, Clone)]
pub struct Image {
    /// Where the image came from (file path, `camera:0#2`, `clip.gif@40`).
    pub source: String,
    /// Image width in pixels (0 for placeholders).
    pub width: u32,
    /// Image height in pixels (0 for placeholders).
    pub height: u32,
    pixels: Result<DynamicImage, String>,
}

impl Image {
    /// Wraps a decoded buffer.
    #[must_use]
    pub fn new(source: impl Into<String>, pixels: DynamicImage) -> Self {
        let (width, height) = pixels.dimensions();
        Self {
            source: source.into(),
            width,
            height,
            pixels: Ok(pixels),
        }
    }

    /// Creates a placeholder for an image that could not be decoded.
    #[must_use]
    pub fn invalid(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            width: 0,
            height: 0,
            pixels: Err(reason.into()),
        }
    }

    /// Returns `true` if the image holds a non-empty pixel buffer.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.pixels.is_ok() && self.width > 0 && self.height > 0
    }

    /// Returns the pixel buffer, if any.
    #[must_use]
    pub fn pixels(&self) -> Option<&DynamicImage> {
        self.pixels.as_ref().ok()
    }

    /// Consumes the image and returns its pixel buffer, if any.
    #[must_use]
    pub fn into_pixels(self) -> Option<DynamicImage> {
        self.pixels.ok()
    }

    /// Returns the decode failure for placeholders.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match &self.pixels {
            Ok(_) if self.width == 0 || self.height == 0 => Some("image is empty"),
            Ok(_) => None,
            Err(reason) => Some(reason),
        }
    }

    /// Returns the number of colour channels (0 for placeholders).
    #[must_use]
    pub fn channels(&self) -> u8 {
        self.pixels().map_or(0, |p| p.color().channel_count())
    }
}

/// An ordered sequence of images forming one stitching attempt.
///
/// Order is significant: neighbouring images are expected to overlap.
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    images: Vec<Image>,
}

impl ImageSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Appends an image, keeping insertion order.
    pub fn push(&mut self, image: Image) {
        self.images.push(image);
    }

    /// Number of images in the set, placeholders included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` if the set holds no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Returns the image at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Image> {
        self.images.get(index)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.images.iter()
    }

    /// Returns the first invalid image and its index.
    #[must_use]
    pub fn first_invalid(&self) -> Option<(usize, &Image)> {
        self.images.iter().enumerate().find(|(_, i)| !i.is_valid())
    }

    /// Returns the images as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Image] {
        &self.images
    }

    /// Consumes the set and returns the images.
    #[must_use]
    pub fn into_vec(self) -> Vec<Image> {
        self.images
    }
}

impl From<Vec<Image>> for ImageSet {
    fn from(images: Vec<Image>) -> Self {
        Self { images }
    }
}

impl FromIterator<Image> for ImageSet {
    fn from_iter<T: IntoIterator<Item = Image>>(iter: T) -> Self {
        Self {
            images: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ImageSet {
    type Item = &'a Image;
    type IntoIter = std::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

impl IntoIterator for ImageSet {
    type Item = Image;
    type IntoIter = std::vec::IntoIter<Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.into_iter()
    }
}
