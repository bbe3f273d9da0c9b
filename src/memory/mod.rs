//! Pointer validation against the process memory map.
//!
//! This module is the leaf of the crate: everything above it (structure decoding,
//! completion simulation, the exported shims) is forbidden from touching a raw address
//! directly and instead goes through the capability tokens produced here.
//!
//! # Architecture
//!
//! - [`MemorySource`] - the one external dependency: "what region contains this address?"
//! - [`RegionInfo`] / [`RegionState`] / [`Protection`] - the normalized query answer
//! - [`Validator`] - applies the dereferenceability rules and mints capabilities
//! - [`CheckedPtr`] / [`CheckedPtrMut`] - bounds-checked access to a validated range
//!
//! # Usage Examples
//!
//! ```rust
//! use ntscope::memory::{OsMemory, Validator};
//!
//! let source = OsMemory::new();
//! let validator = Validator::new(&source);
//!
//! let local = 0xAABB_CCDDu32;
//! let addr = std::ptr::addr_of!(local) as usize;
//!
//! // Our own stack is mapped; null is not.
//! # #[cfg(any(windows, target_os = "linux"))]
//! assert!(validator.validate(addr, 4));
//! assert!(!validator.validate(0, 4));
//! ```

pub(crate) mod access;
pub(crate) mod region;
pub(crate) mod source;
pub(crate) mod validator;

pub use access::{CheckedPtr, CheckedPtrMut, RawLayout};
pub use region::{Protection, RegionInfo, RegionState};
pub use source::{FixtureMemory, MemorySource, OsMemory};
pub use validator::{PointerState, Validator};
