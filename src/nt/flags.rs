//! Flag and disposition decoding for the intercepted call's integer arguments.

use std::fmt;

use bitflags::bitflags;
use strum::{Display, EnumIter, FromRepr};

/// Bitmask of the attribute bits a well-formed attributes block may carry
/// (`OBJ_VALID_ATTRIBUTES`).
pub const OBJ_VALID_ATTRIBUTES: u32 = 0x0000_07F2;

bitflags! {
    /// `OBJ_*` flags carried in the attributes block (ntdef.h).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectFlags: u32 {
        /// Handle is inheritable by child processes.
        const INHERIT = 0x0000_0002;
        /// Object persists past the last handle close.
        const PERMANENT = 0x0000_0010;
        /// Exclusive access to the object.
        const EXCLUSIVE = 0x0000_0020;
        /// Name lookup is case insensitive.
        const CASE_INSENSITIVE = 0x0000_0040;
        /// Open an existing object instead of failing on collision.
        const OPENIF = 0x0000_0080;
        /// Open the symbolic link itself, not its target.
        const OPENLINK = 0x0000_0100;
        /// Handle is accessible only from kernel mode.
        const KERNEL_HANDLE = 0x0000_0200;
        /// Force access checks even for kernel-mode callers.
        const FORCE_ACCESS_CHECK = 0x0000_0400;
    }
}

impl ObjectFlags {
    /// Extract the recognized attribute flags from a raw `attributes` field.
    #[must_use]
    pub fn from_attributes(raw: u32) -> Self {
        Self::from_bits_truncate(raw & OBJ_VALID_ATTRIBUTES)
    }
}

impl fmt::Display for ObjectFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("(none)")
        } else {
            bitflags::parser::to_writer(self, f)
        }
    }
}

/// Create disposition of an open-file request (ntioapi.h), one of six exclusive values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, FromRepr)]
#[repr(u32)]
pub enum CreateDisposition {
    /// Replace the file if it exists, create it otherwise.
    #[strum(to_string = "FILE_SUPERSEDE")]
    Supersede = 0,
    /// Open the file, fail if it does not exist.
    #[strum(to_string = "FILE_OPEN")]
    Open = 1,
    /// Create the file, fail if it exists.
    #[strum(to_string = "FILE_CREATE")]
    Create = 2,
    /// Open the file, create it if it does not exist.
    #[strum(to_string = "FILE_OPEN_IF")]
    OpenIf = 3,
    /// Open and truncate, fail if it does not exist.
    #[strum(to_string = "FILE_OVERWRITE")]
    Overwrite = 4,
    /// Open and truncate, create it if it does not exist.
    #[strum(to_string = "FILE_OVERWRITE_IF")]
    OverwriteIf = 5,
}

impl CreateDisposition {
    /// Decode a raw disposition value; out-of-range values yield `None`.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::from_repr(raw)
    }
}

bitflags! {
    /// `FILE_*` create options of an open-file request (ntioapi.h).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CreateOptions: u32 {
        /// The file being opened must be a directory.
        const DIRECTORY_FILE = 0x0000_0001;
        /// Writes go through to storage before completion.
        const WRITE_THROUGH = 0x0000_0002;
        /// Access will be mostly sequential.
        const SEQUENTIAL_ONLY = 0x0000_0004;
        /// No intermediate buffering of file data.
        const NO_INTERMEDIATE_BUFFERING = 0x0000_0008;
        /// All operations are performed synchronously, non-alertable.
        const SYNCHRONOUS_IO_NONALERT = 0x0000_0020;
        /// The file being opened must not be a directory.
        const NON_DIRECTORY_FILE = 0x0000_0040;
        /// Access will be mostly random.
        const RANDOM_ACCESS = 0x0000_0800;
    }
}

impl CreateOptions {
    /// Extract the recognized option flags from a raw options argument.
    #[must_use]
    pub fn from_options(raw: u32) -> Self {
        Self::from_bits_truncate(raw)
    }
}

impl fmt::Display for CreateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("(none)")
        } else {
            bitflags::parser::to_writer(self, f)
        }
    }
}
