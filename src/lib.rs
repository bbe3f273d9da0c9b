// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
//#![deny(unsafe_code)]
// - 'memory/access.rs' performs the validated raw reads and writes
// - 'memory/source.rs' calls the OS memory-map query on Windows

//! # ntscope
//!
//! A memory-safety-validated introspection layer for intercepted Windows NT system calls.
//! Built in pure Rust, `ntscope` stands in for native I/O entry points, proves every
//! caller-supplied pointer addressable before touching it, decodes the OS structures
//! behind the valid ones, and optionally simulates the real call's side effects.
//!
//! ## Features
//!
//! - **🛡️ Check before acting** - no dereference without a successful memory-map query;
//!   hostile pointers produce report entries, never faults
//! - **🔍 Structured reports** - every argument mirrored with an explicit
//!   null / invalid / valid state; partial failure never suppresses the rest
//! - **📦 Capability tokens** - raw access exists only behind validated, bounds-checked
//!   pointers minted by the validator
//! - **⚙️ Completion simulation** - sentinel handle, status, and transfer writes with
//!   per-target outcome reporting and an opt-in fault-injection probe
//! - **🔧 Testable anywhere** - the memory-map query is a trait; a synthetic fixture
//!   backend drives the full decode/simulate machinery on any host
//!
//! ## Quick Start
//!
//! Add `ntscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ntscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use ntscope::prelude::*;
//!
//! let source = OsMemory::new();
//! let inspector = Inspector::new(&source);
//!
//! // Arbitrary addresses are safe to describe; null pointers report as absent and
//! // kernel-half addresses as invalid, never as a fault.
//! let report = inspector.describe(0, usize::MAX & !0xFFF, 0);
//! assert!(!report.attributes.is_valid());
//! assert!(matches!(report.handle_slot, Inspected::Absent));
//! ```
//!
//! ### Inspecting a Real Call
//!
//! ```rust,no_run
//! use ntscope::prelude::*;
//!
//! # let (handle_slot_addr, oa_addr, iosb_addr) = (0usize, 0usize, 0usize);
//! let source = OsMemory::new();
//! let inspector = Inspector::new(&source);
//!
//! let args = CreateFileArgs {
//!     handle_slot: handle_slot_addr,
//!     desired_access: 0x0012_0196,
//!     object_attributes: oa_addr,
//!     io_status: iosb_addr,
//!     create_disposition: 1,  // FILE_OPEN
//!     create_options: 0x20,   // FILE_SYNCHRONOUS_IO_NONALERT
//! };
//!
//! let report = inspector.describe_create(&args);
//! report.render(&mut std::io::stdout())?;
//!
//! let simulation = inspector.simulate_create(&args, &SimulationOptions::default());
//! assert!(simulation.complete());
//! # Ok::<(), ntscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `ntscope` is organized into three layers, each built on the one below:
//!
//! - [`memory`] - pointer validation: the memory-map query ([`memory::MemorySource`]),
//!   the dereferenceability rules ([`memory::Validator`]), and the capability tokens
//!   ([`memory::CheckedPtr`] / [`memory::CheckedPtrMut`]) that are the only way any code
//!   in this crate touches a raw address
//! - [`nt`] - the intercepted ABI as plain data: `#[repr(C)]` structure layouts, flag
//!   bitmasks, dispositions, and status codes
//! - [`inspect`] - the [`inspect::Inspector`]: the read-only decode path producing
//!   [`inspect::CallReport`], and the mutate path producing [`inspect::SimulationReport`]
//!
//! The exported C entry points in [`shim`] are thin wrappers over the inspector for
//! hosts that load this crate as a shared library.
//!
//! ## Scope
//!
//! The layer operates strictly on addresses valid in the calling process's own address
//! space. It is not a system-call emulator and not a sandbox: validation answers "can
//! this be touched right now", nothing more, and concurrent remapping by other threads
//! remains the caller's hazard.

pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use ntscope::prelude::*;
///
/// let page = [0u8; 16];
/// let fixture = FixtureMemory::covering(&page);
/// let validator = Validator::new(&fixture);
/// assert!(validator.validate(page.as_ptr() as usize, 16));
/// ```
pub mod prelude;

/// Pointer validation against the process memory map.
///
/// The leaf layer of the crate: region queries, the dereferenceability judgment, and the
/// checked-access capability tokens. See [`memory::Validator`] for the rules.
pub mod memory;

/// The intercepted call's ABI surface: structure layouts, flags, and status codes.
///
/// Plain `#[repr(C)]` data definitions with no behavior of their own; they are only
/// materialized from caller memory through validated reads.
pub mod nt;

/// Structure inspection: the decode and simulate paths over validated pointers.
///
/// [`inspect::Inspector`] is the main entry point for library consumers.
pub mod inspect;

/// Exported shim entry points for hosts loading this crate as a shared library.
pub mod shim;

/// `ntscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. Used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `ntscope` Error type
///
/// The main error type for all operations in this crate. Most of the API is total;
/// see [`Error`] for the few conditions that do surface as errors.
pub use error::Error;
