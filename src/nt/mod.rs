//! The intercepted call's ABI surface: structure layouts, flags, and status codes.
//!
//! Everything here is plain data. Decoding logic lives in [`crate::inspect`]; the only
//! OS-specific behavior in the crate is the memory-map query in [`crate::memory`].

pub(crate) mod flags;
pub(crate) mod layout;

pub use flags::{CreateDisposition, CreateOptions, ObjectFlags, OBJ_VALID_ATTRIBUTES};
pub use layout::{Handle, IoStatusBlockRaw, ObjectAttributesRaw, UnicodeStringRaw};

/// NT status code, as returned by the exported shims.
pub type NtStatus = u32;

/// The call completed successfully (`STATUS_SUCCESS`).
pub const STATUS_SUCCESS: NtStatus = 0x0000_0000;

/// An output pointer failed validation (`STATUS_ACCESS_VIOLATION`).
pub const STATUS_ACCESS_VIOLATION: NtStatus = 0xC000_0005;
