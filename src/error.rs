use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Most of the crate is infallible: pointer validation is total over all inputs (including
/// null and unmapped addresses), and the describe/simulate paths report per-field failure
/// states instead of propagating errors. The variants below cover the few operations that
/// genuinely can fail.
///
/// # Error Categories
///
/// ## Checked Access Errors
/// - [`Error::OutOfBounds`] - Attempted to read or write beyond a checked pointer's extent
///
/// ## I/O Errors
/// - [`Error::SinkError`] - Writing a rendered report into a caller-supplied sink failed
///
/// # Examples
///
/// ```rust
/// use ntscope::{Error, memory::{FixtureMemory, Validator}};
///
/// let page = [0u8; 16];
/// let fixture = FixtureMemory::covering(&page);
/// let validator = Validator::new(&fixture);
///
/// let ptr = validator.checked(page.as_ptr() as usize, page.len()).unwrap();
/// match ptr.read_at::<u64>(12) {
///     Err(Error::OutOfBounds) => {} // 12 + 8 > 16
///     other => panic!("expected OutOfBounds, got {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An out of bound access was attempted through a checked pointer.
    ///
    /// This error occurs when a typed read or write on a [`crate::memory::CheckedPtr`] /
    /// [`crate::memory::CheckedPtrMut`] would extend past the byte length the pointer was
    /// validated for. It is a safety check, not a report-level condition: a rejected *raw*
    /// pointer surfaces as an `invalid` field in the report instead.
    #[error("Out of bound access would have occurred!")]
    OutOfBounds,

    /// Writing a rendered report to an output sink failed.
    ///
    /// Wraps standard I/O errors from the caller-supplied [`std::io::Write`] sink used by
    /// the report rendering helpers. Decoding itself never performs I/O.
    #[error("{0}")]
    SinkError(#[from] std::io::Error),
}
