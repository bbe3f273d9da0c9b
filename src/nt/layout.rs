//! Fixed memory layouts of the intercepted structures.
//!
//! These are the `ntdef.h` / `ntioapi.h` shapes as plain `#[repr(C)]` records. Pointer
//! fields are typed as `usize` rather than real pointers: a value copied out of caller
//! memory is just a number until the validator says otherwise, and a number cannot be
//! dereferenced by accident. The structures are only ever materialized through
//! [`crate::memory::CheckedPtr::read`], never by casting a bare address.
//!
//! Layout is little-endian, native pointer width. On 64-bit targets the sizes are
//! 48 / 16 / 16 bytes respectively, matching the native ABI including its padding holes.

use crate::memory::RawLayout;

/// An opaque, pointer-sized resource identifier (`HANDLE`).
pub type Handle = usize;

/// The attributes/descriptor block passed to object-opening calls (`OBJECT_ATTRIBUTES`).
///
/// # Structure layout (ntdef.h, 64-bit)
/// | Field | Offset | Size | Description |
/// |-------|--------|------|-------------|
/// | `length` | 0 | 4 | Declared size of the block itself |
/// | `root_directory` | 8 | 8 | Optional owning-scope handle |
/// | `object_name` | 16 | 8 | Address of a [`UnicodeStringRaw`] |
/// | `attributes` | 24 | 4 | `OBJ_*` flag bitmask |
/// | `security_descriptor` | 32 | 8 | Optional security descriptor address |
/// | `security_quality_of_service` | 40 | 8 | Optional QoS block address |
///
/// The block does not own the memory behind `object_name` or the two security fields;
/// those addresses may be null, dangling, or hostile, and every access re-validates.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ObjectAttributesRaw {
    /// Declared size of the block, in bytes.
    pub length: u32,
    /// Optional handle the object name is resolved relative to.
    pub root_directory: Handle,
    /// Address of the name view, or null.
    pub object_name: usize,
    /// `OBJ_*` flags, decoded by [`crate::nt::ObjectFlags`].
    pub attributes: u32,
    /// Address of a security descriptor, or null. Reported, never decoded.
    pub security_descriptor: usize,
    /// Address of a security quality-of-service block, or null. Reported, never decoded.
    pub security_quality_of_service: usize,
}

/// A length-prefixed, non-owning view over a wide-character buffer (`UNICODE_STRING`).
///
/// # Structure layout (ntdef.h, 64-bit)
/// | Field | Offset | Size | Description |
/// |-------|--------|------|-------------|
/// | `length` | 0 | 2 | Used length of the buffer, in bytes |
/// | `maximum_length` | 2 | 2 | Capacity of the buffer, in bytes |
/// | `buffer` | 8 | 8 | Address of the UTF-16 data |
///
/// `length <= maximum_length` is expected but never assumed: reads clamp to the extent
/// the validator actually approved, whatever the declared length claims.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct UnicodeStringRaw {
    /// Used length in bytes (not characters).
    pub length: u16,
    /// Buffer capacity in bytes.
    pub maximum_length: u16,
    /// Address of the backing UTF-16 buffer, or null.
    pub buffer: usize,
}

/// The status/result output block of an I/O call (`IO_STATUS_BLOCK`).
///
/// # Structure layout (ntioapi.h, 64-bit)
/// | Field | Offset | Size | Description |
/// |-------|--------|------|-------------|
/// | `status` | 0 | 8 | Completion status (union with a pointer in the native header) |
/// | `information` | 8 | 8 | Result size or value |
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IoStatusBlockRaw {
    /// Completion status code, pointer-sized per the native union.
    pub status: usize,
    /// Request-dependent result value, typically a byte count.
    pub information: usize,
}

// Safety: #[repr(C)], every field is an integer, any bit pattern is a valid value.
unsafe impl RawLayout for ObjectAttributesRaw {}
unsafe impl RawLayout for UnicodeStringRaw {}
unsafe impl RawLayout for IoStatusBlockRaw {}

#[cfg(test)]
mod tests {
    use std::mem::{offset_of, size_of};

    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn sizes_match_the_native_abi() {
        assert_eq!(size_of::<ObjectAttributesRaw>(), 48);
        assert_eq!(size_of::<UnicodeStringRaw>(), 16);
        assert_eq!(size_of::<IoStatusBlockRaw>(), 16);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn object_attributes_field_offsets() {
        assert_eq!(offset_of!(ObjectAttributesRaw, length), 0);
        assert_eq!(offset_of!(ObjectAttributesRaw, root_directory), 8);
        assert_eq!(offset_of!(ObjectAttributesRaw, object_name), 16);
        assert_eq!(offset_of!(ObjectAttributesRaw, attributes), 24);
        assert_eq!(offset_of!(ObjectAttributesRaw, security_descriptor), 32);
        assert_eq!(
            offset_of!(ObjectAttributesRaw, security_quality_of_service),
            40
        );
    }

    #[test]
    fn unicode_string_prefix_is_packed() {
        assert_eq!(offset_of!(UnicodeStringRaw, length), 0);
        assert_eq!(offset_of!(UnicodeStringRaw, maximum_length), 2);
        assert_eq!(offset_of!(UnicodeStringRaw, buffer), size_of::<usize>());
    }
}
