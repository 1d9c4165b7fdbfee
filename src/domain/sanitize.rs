//! Markup sanitization seam

/// Strips unsafe markup from user-supplied text.
///
/// Implementations must be pure and total, and cleaning already-clean text
/// must return it unchanged.
pub trait Sanitizer: Send + Sync {
    fn clean(&self, value: &str) -> String;

    fn clean_opt(&self, value: Option<&str>) -> Option<String> {
        value.map(|v| self.clean(v))
    }
}
