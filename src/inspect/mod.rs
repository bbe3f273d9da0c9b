//! Structure inspection for intercepted calls.
//!
//! The [`Inspector`] is the crate's main entry point. It is built on the pointer
//! validation layer and exposes the two halves of the interception contract:
//!
//! - **decode** ([`Inspector::describe`], [`Inspector::describe_create`]) - classify every
//!   pointer argument, decode the structures behind the valid ones, and produce a
//!   [`CallReport`]; read-only and total over arbitrary input.
//! - **simulate** ([`Inspector::simulate_create`], [`Inspector::simulate_read`]) - write
//!   the side effects a real call would have produced into the validated output pointers,
//!   recording a per-target [`SimulationReport`]; best-effort, no rollback.
//!
//! # Usage Examples
//!
//! ```rust
//! use ntscope::inspect::{CreateFileArgs, Inspector};
//! use ntscope::memory::OsMemory;
//!
//! let source = OsMemory::new();
//! let inspector = Inspector::new(&source);
//!
//! // Null everything: the report marks every structure absent instead of failing.
//! let args = CreateFileArgs {
//!     handle_slot: 0,
//!     desired_access: 0x0012_0196,
//!     object_attributes: 0,
//!     io_status: 0,
//!     create_disposition: 1,
//!     create_options: 0x20,
//! };
//! let report = inspector.describe_create(&args);
//! assert!(!report.attributes.is_valid());
//! ```

pub(crate) mod describe;
pub(crate) mod report;
pub(crate) mod simulate;

pub use report::{
    CallReport, HandleSlot, Inspected, IoStatusReport, NameReport, ObjectAttributesReport,
    RequestInfo, SecurityField, SimulationReport, WriteOutcome,
};
pub use simulate::{
    SimulationOptions, FILL_BYTE, FILL_PREFIX_LEN, SENTINEL_HANDLE, SENTINEL_INFORMATION,
};

use crate::memory::{MemorySource, Validator};
use crate::nt::Handle;

/// Raw arguments of an intercepted open-file call, addresses as plain numbers.
///
/// Mirrors the positional argument list of the native call: output-handle-slot address,
/// access mask, attributes-block address, status-block address, and the two integer
/// option fields. Nothing here is trusted; every address goes through validation.
#[derive(Debug, Clone, Copy)]
pub struct CreateFileArgs {
    /// Address of the caller's handle output slot.
    pub handle_slot: usize,
    /// Requested access mask.
    pub desired_access: u32,
    /// Address of the attributes block.
    pub object_attributes: usize,
    /// Address of the status/result block.
    pub io_status: usize,
    /// Raw create disposition value.
    pub create_disposition: u32,
    /// Raw create options value.
    pub create_options: u32,
}

/// Raw arguments of an intercepted read call.
#[derive(Debug, Clone, Copy)]
pub struct ReadFileArgs {
    /// Handle the caller believes it is reading from. Opaque, never dereferenced.
    pub handle: Handle,
    /// Address of the caller's data buffer.
    pub buffer: usize,
    /// Requested transfer length in bytes.
    pub length: u32,
    /// Address of the status/result block.
    pub io_status: usize,
}

/// Decodes and mutates the structures behind an intercepted call's pointer arguments.
///
/// Holds no state besides its validator; one inspector can serve any number of calls.
/// All operations are total: hostile pointers produce `invalid` report entries, never
/// faults.
pub struct Inspector<'a> {
    pub(crate) validator: Validator<'a>,
}

impl<'a> Inspector<'a> {
    /// Create an inspector judging pointers against `source`.
    #[must_use]
    pub fn new(source: &'a dyn MemorySource) -> Self {
        Inspector {
            validator: Validator::new(source),
        }
    }

    /// The underlying validator, for callers that need raw range checks.
    #[must_use]
    pub fn validator(&self) -> &Validator<'a> {
        &self.validator
    }
}
