//! # ntscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the ntscope library. Import this module to get quick access to the essential
//! types for intercepted-call inspection.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all ntscope operations
pub use crate::Error;

/// The result type used throughout ntscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Decodes and mutates the structures behind an intercepted call
pub use crate::inspect::Inspector;

/// Argument bundles for the supported call shapes
pub use crate::inspect::{CreateFileArgs, ReadFileArgs};

/// Side-effect selection for the simulate path
pub use crate::inspect::SimulationOptions;

/// Sentinel values written by the simulate path
pub use crate::inspect::{FILL_BYTE, FILL_PREFIX_LEN, SENTINEL_HANDLE, SENTINEL_INFORMATION};

// ================================================================================================
// Reports
// ================================================================================================

/// The decode-path report and its per-field entries
pub use crate::inspect::{
    CallReport, HandleSlot, Inspected, IoStatusReport, NameReport, ObjectAttributesReport,
    RequestInfo, SecurityField,
};

/// The mutate-path report and per-target outcomes
pub use crate::inspect::{SimulationReport, WriteOutcome};

// ================================================================================================
// Pointer Validation
// ================================================================================================

/// The validation gate and its capability tokens
pub use crate::memory::{CheckedPtr, CheckedPtrMut, PointerState, Validator};

/// Memory-map query backends
pub use crate::memory::{FixtureMemory, MemorySource, OsMemory};

/// Region descriptors produced by the query
pub use crate::memory::{Protection, RegionInfo, RegionState};

// ================================================================================================
// ABI Surface
// ================================================================================================

/// Structure layouts of the intercepted call
pub use crate::nt::{Handle, IoStatusBlockRaw, ObjectAttributesRaw, UnicodeStringRaw};

/// Flag and disposition decoding
pub use crate::nt::{CreateDisposition, CreateOptions, ObjectFlags};

/// Status codes returned by the shims
pub use crate::nt::{NtStatus, STATUS_ACCESS_VIOLATION, STATUS_SUCCESS};
