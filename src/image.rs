//! Decorative images attached to every reply.
//!
//! Images never affect game logic. A source that cannot produce a URL must
//! fall back to a fixed one instead of failing.

/// Fallback picture used when nothing better is available.
pub const DEFAULT_FALLBACK_IMAGE_URL: &str = "https://cataas.com/cat";

/// Produces the image URL attached to a reply.
///
/// Implementations that fetch from a remote API return their fallback on
/// failure:
///
/// ```rust
/// use guess_state::image::{ImageSource, DEFAULT_FALLBACK_IMAGE_URL};
///
/// struct RandomCat<F> {
///     fetch: F,
/// }
///
/// impl<F: Fn() -> Result<String, String>> ImageSource for RandomCat<F> {
///     fn image_url(&self) -> String {
///         (self.fetch)().unwrap_or_else(|_| DEFAULT_FALLBACK_IMAGE_URL.to_string())
///     }
/// }
///
/// let down = RandomCat { fetch: || Err("status 503".to_string()) };
/// assert_eq!(down.image_url(), DEFAULT_FALLBACK_IMAGE_URL);
///
/// let up = RandomCat { fetch: || Ok("https://example.com/cat.jpg".to_string()) };
/// assert_eq!(up.image_url(), "https://example.com/cat.jpg");
/// ```
pub trait ImageSource {
    fn image_url(&self) -> String;
}

/// Always returns the same URL.
#[derive(Debug, Clone)]
pub struct StaticImage {
    url: String,
}

impl StaticImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for StaticImage {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_IMAGE_URL)
    }
}

impl ImageSource for StaticImage {
    fn image_url(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_image() {
        let source = StaticImage::new("https://example.com/a.jpg");
        assert_eq!(source.image_url(), "https://example.com/a.jpg");
    }
}
