//! The pointer validation gate.
//!
//! [`Validator`] is the only component allowed to turn a raw address into something
//! dereferenceable. It asks a [`MemorySource`] for the region containing the address and
//! applies one rule set: the region must be committed, must not be guarded, and must carry
//! at least one access permission; the requested byte range must lie inside that region.
//! Everything downstream (structure decoding, completion simulation) consumes the
//! [`CheckedPtr`] / [`CheckedPtrMut`] capability tokens this module hands out.
//!
//! The judgment comes from a single query at the base address. That one answer already
//! carries the region's extent, so a range that provably leaves its region is rejected.
//! Ranges spanning several adjacent regions are rejected even when every spanned region
//! would individually pass; no re-query at `addr + len - 1` is performed.

use std::fmt;

use crate::memory::access::{CheckedPtr, CheckedPtrMut};
use crate::memory::region::Protection;
use crate::memory::source::MemorySource;

/// Classification of a raw pointer argument, mirrored per-field in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerState {
    /// The pointer was null.
    Null,
    /// The pointer was non-null but validation rejected it (unmapped, uncommitted,
    /// no-access, guarded, or the range leaves its region).
    Invalid,
    /// The pointer passed validation for the requested extent.
    Valid,
}

impl PointerState {
    /// Whether this state permits dereferencing.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, PointerState::Valid)
    }
}

impl fmt::Display for PointerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerState::Null => f.write_str("null"),
            PointerState::Invalid => f.write_str("invalid"),
            PointerState::Valid => f.write_str("valid"),
        }
    }
}

/// Judges whether raw address ranges are safe to dereference.
///
/// The validator is a pure query layer: it holds no state besides its [`MemorySource`]
/// and never touches memory itself. All checks are total: any address, including null,
/// produces an answer rather than an error.
///
/// # Examples
///
/// ```rust
/// use ntscope::memory::{FixtureMemory, Validator};
///
/// let page = [0u8; 32];
/// let fixture = FixtureMemory::covering(&page);
/// let validator = Validator::new(&fixture);
///
/// assert!(!validator.validate(0, 8));
/// assert!(validator.validate(page.as_ptr() as usize, 32));
/// ```
pub struct Validator<'a> {
    source: &'a dyn MemorySource,
}

impl<'a> Validator<'a> {
    /// Create a validator backed by `source`.
    #[must_use]
    pub fn new(source: &'a dyn MemorySource) -> Self {
        Validator { source }
    }

    /// Whether `[addr, addr + len)` is safe to read.
    ///
    /// Returns `false` for null, for addresses outside any region, for regions that are
    /// not committed, carry no access permission, or are guarded, and for ranges that
    /// extend past the end of their containing region. A `len` of zero probes the single
    /// byte at `addr`. Never fails; a failed underlying query is simply `false`.
    #[must_use]
    pub fn validate(&self, addr: usize, len: usize) -> bool {
        if addr == 0 {
            return false;
        }
        match self.source.region_at(addr) {
            Some(region) => region.is_dereferenceable() && region.covers(addr, len),
            None => false,
        }
    }

    /// Classify `addr` for reporting purposes.
    #[must_use]
    pub fn check(&self, addr: usize, len: usize) -> PointerState {
        if addr == 0 {
            PointerState::Null
        } else if self.validate(addr, len) {
            PointerState::Valid
        } else {
            PointerState::Invalid
        }
    }

    /// Classify `addr` as a write target: like [`Validator::check`], but `Valid`
    /// additionally requires the region to be writable.
    #[must_use]
    pub fn check_write(&self, addr: usize, len: usize) -> PointerState {
        match self.check(addr, len) {
            PointerState::Valid if self.checked_mut(addr, len).is_none() => {
                PointerState::Invalid
            }
            state => state,
        }
    }

    /// Produce a read capability for `[addr, addr + len)`, or `None` if validation fails.
    #[must_use]
    pub fn checked(&self, addr: usize, len: usize) -> Option<CheckedPtr> {
        if self.validate(addr, len) {
            Some(CheckedPtr::new(addr, len))
        } else {
            None
        }
    }

    /// Produce a write capability for `[addr, addr + len)`.
    ///
    /// On top of the read criteria the region must carry [`Protection::WRITE`]: a write
    /// into a read-only target would fault, and an unwritable target must surface as a
    /// reported skip instead.
    #[must_use]
    pub fn checked_mut(&self, addr: usize, len: usize) -> Option<CheckedPtrMut> {
        if addr == 0 {
            return None;
        }
        let region = self.source.region_at(addr)?;
        if region.is_dereferenceable()
            && region.protection.contains(Protection::WRITE)
            && region.covers(addr, len)
        {
            Some(CheckedPtrMut::new(addr, len))
        } else {
            None
        }
    }

    /// Produce a read capability clamped to the containing region's extent.
    ///
    /// Used for length-prefixed buffers whose declared length is caller-controlled: the
    /// returned token covers `min(len, bytes remaining in the region)`, and the flag
    /// reports whether clamping occurred (the declared length was inconsistent with the
    /// validated extent). `None` means the base address itself failed validation.
    #[must_use]
    pub fn clamped(&self, addr: usize, len: usize) -> Option<(CheckedPtr, bool)> {
        if addr == 0 {
            return None;
        }
        let region = self.source.region_at(addr)?;
        if !region.is_dereferenceable() || !region.contains(addr) {
            return None;
        }

        let extent = region.end() - addr;
        let clamped = len.min(extent);
        Some((CheckedPtr::new(addr, clamped), clamped < len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::region::{RegionInfo, RegionState};
    use crate::memory::source::FixtureMemory;

    #[test]
    fn null_is_never_valid() {
        let fixture = FixtureMemory::new();
        let validator = Validator::new(&fixture);

        assert!(!validator.validate(0, 1));
        assert!(!validator.validate(0, 0));
        assert_eq!(validator.check(0, 8), PointerState::Null);
    }

    #[test]
    fn unmapped_addresses_are_invalid_for_any_length() {
        let fixture = FixtureMemory::new();
        let validator = Validator::new(&fixture);

        for len in [1, 16, 4096, usize::MAX] {
            assert!(!validator.validate(0x10_0000, len));
        }
        assert_eq!(validator.check(0x10_0000, 1), PointerState::Invalid);
    }

    #[test]
    fn committed_region_validates_up_to_its_size() {
        let page = [0u8; 64];
        let base = page.as_ptr() as usize;
        let fixture = FixtureMemory::covering(&page);
        let validator = Validator::new(&fixture);

        for len in 1..=64 {
            assert!(validator.validate(base, len), "len {len} should be valid");
        }
        assert!(!validator.validate(base, 65));
        assert!(validator.validate(base + 63, 1));
        assert!(!validator.validate(base + 63, 2));
    }

    #[test]
    fn range_into_adjoining_no_access_region_is_rejected() {
        let page = [0u8; 32];
        let base = page.as_ptr() as usize;
        let fixture = FixtureMemory::covering(&page).with_region(RegionInfo {
            base: base + 32,
            size: 0x1000,
            state: RegionState::Committed,
            protection: Protection::empty(),
        });
        let validator = Validator::new(&fixture);

        assert!(validator.validate(base, 32));
        assert!(!validator.validate(base, 33));
        assert!(!validator.validate(base + 32, 1));
    }

    #[test]
    fn uncommitted_and_guarded_regions_are_rejected() {
        let fixture = FixtureMemory::new()
            .with_region(RegionInfo {
                base: 0x2000,
                size: 0x1000,
                state: RegionState::Reserved,
                protection: Protection::READ | Protection::WRITE,
            })
            .with_region(RegionInfo {
                base: 0x3000,
                size: 0x1000,
                state: RegionState::Committed,
                protection: Protection::READ | Protection::GUARD,
            });
        let validator = Validator::new(&fixture);

        assert!(!validator.validate(0x2000, 1));
        assert!(!validator.validate(0x3000, 1));
    }

    #[test]
    fn write_capability_requires_write_protection() {
        let readable = [0u8; 16];
        let mut writable = [0u8; 16];
        let ro_base = readable.as_ptr() as usize;
        let rw_base = writable.as_ptr() as usize;
        let fixture = FixtureMemory::covering(&readable).with_writable(&mut writable);
        let validator = Validator::new(&fixture);

        assert!(validator.checked(ro_base, 16).is_some());
        assert!(validator.checked_mut(ro_base, 16).is_none());
        assert_eq!(validator.check_write(ro_base, 16), PointerState::Invalid);

        assert!(validator.checked_mut(rw_base, 16).is_some());
        assert_eq!(validator.check_write(rw_base, 16), PointerState::Valid);
        assert_eq!(validator.check_write(0, 16), PointerState::Null);
    }

    #[test]
    fn clamped_reports_inconsistent_lengths() {
        let page = [0u8; 8];
        let base = page.as_ptr() as usize;
        let fixture = FixtureMemory::covering(&page);
        let validator = Validator::new(&fixture);

        let (ptr, truncated) = validator.clamped(base, 8).unwrap();
        assert_eq!(ptr.len(), 8);
        assert!(!truncated);

        let (ptr, truncated) = validator.clamped(base, 64).unwrap();
        assert_eq!(ptr.len(), 8);
        assert!(truncated);

        let (ptr, truncated) = validator.clamped(base, 0).unwrap();
        assert!(ptr.is_empty());
        assert!(!truncated);

        assert!(validator.clamped(0, 8).is_none());
        assert!(validator.clamped(0xDEAD_0000, 8).is_none());
    }
}
