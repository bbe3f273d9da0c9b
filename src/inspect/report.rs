//! The structured report produced by the decode path.
//!
//! Every field of the intercepted call mirrors its data-model entity wrapped in
//! [`Inspected`], so a report always says one of three things per structure: the pointer
//! was null, the pointer failed validation, or here is the decoded content. Partial
//! failure of one substructure never suppresses the others.
//!
//! The [`std::fmt::Display`] implementations produce the line-oriented human dump; its
//! exact text is not a stable interface. Automation should consume the report types
//! themselves. Rendering goes through a caller-supplied sink, never an implicit global
//! stream.

use std::fmt;
use std::io;

use crate::memory::PointerState;
use crate::nt::{CreateDisposition, CreateOptions, Handle, ObjectFlags};
use crate::Result;

/// Outcome of inspecting one pointer argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspected<T> {
    /// The pointer was null; nothing further was attempted.
    Absent,
    /// The pointer failed validation; no dereference was attempted.
    Invalid {
        /// The rejected address.
        addr: usize,
    },
    /// The pointer validated and its content was decoded.
    Valid(T),
}

impl<T> Inspected<T> {
    /// Whether decoding succeeded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Inspected::Valid(_))
    }

    /// The decoded content, if any.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Inspected::Valid(value) => Some(value),
            _ => None,
        }
    }

    /// Transform the decoded content, preserving the absent/invalid states.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Inspected<U> {
        match self {
            Inspected::Valid(value) => Inspected::Valid(f(value)),
            Inspected::Absent => Inspected::Absent,
            Inspected::Invalid { addr } => Inspected::Invalid { addr },
        }
    }
}

/// The integer arguments of an open-file request, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    /// Raw access mask as supplied by the caller.
    pub desired_access: u32,
    /// Raw create disposition value.
    pub disposition_raw: u32,
    /// Recognized disposition, or `None` for out-of-range values.
    pub disposition: Option<CreateDisposition>,
    /// Raw create options value.
    pub options_raw: u32,
    /// Recognized option flags (unknown bits dropped).
    pub options: CreateOptions,
}

impl RequestInfo {
    /// Decode the three integer arguments of an open-file request.
    #[must_use]
    pub fn new(desired_access: u32, disposition_raw: u32, options_raw: u32) -> Self {
        RequestInfo {
            desired_access,
            disposition_raw,
            disposition: CreateDisposition::from_raw(disposition_raw),
            options_raw,
            options: CreateOptions::from_options(options_raw),
        }
    }
}

/// The caller's handle output slot and its current content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleSlot {
    /// Address of the slot.
    pub addr: usize,
    /// Value present in the slot at inspection time.
    pub value: Handle,
}

/// A security pointer field: reported by address and validity, never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityField {
    /// The address carried in the attributes block.
    pub addr: usize,
    /// Validity of that address, judged for a single-byte probe.
    pub state: PointerState,
}

/// Decoded name view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameReport {
    /// Address of the name view structure.
    pub addr: usize,
    /// Declared used length, in bytes.
    pub declared_length: u16,
    /// Declared capacity, in bytes.
    pub maximum_length: u16,
    /// Address of the backing wide-character buffer.
    pub buffer: usize,
    /// Validity of the backing buffer.
    pub buffer_state: PointerState,
    /// Decoded text, when the buffer validated. Lossy: unpaired surrogates are replaced.
    pub text: Option<String>,
    /// Number of whole wide characters actually decoded.
    pub char_count: usize,
    /// Whether the declared length exceeded the validated extent and the read was clamped.
    pub truncated: bool,
}

/// Decoded attributes block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAttributesReport {
    /// Address of the block.
    pub addr: usize,
    /// Declared size of the block.
    pub length: u32,
    /// Owning-scope handle, or zero.
    pub root_directory: Handle,
    /// Raw attribute bits.
    pub attributes_raw: u32,
    /// Recognized attribute flags.
    pub attributes: ObjectFlags,
    /// Nested name view, inspected independently.
    pub name: Inspected<NameReport>,
    /// Security descriptor pointer field.
    pub security_descriptor: SecurityField,
    /// Security quality-of-service pointer field.
    pub security_quality_of_service: SecurityField,
}

/// Decoded status/result block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoStatusReport {
    /// Address of the block.
    pub addr: usize,
    /// Status field content at inspection time.
    pub status: usize,
    /// Information field content at inspection time.
    pub information: usize,
}

/// The full decode-path report for one intercepted call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallReport {
    /// Integer-argument decode, present for the open-file shim, absent for plain dumps.
    pub request: Option<RequestInfo>,
    /// The handle output slot.
    pub handle_slot: Inspected<HandleSlot>,
    /// The attributes block and everything nested under it.
    pub attributes: Inspected<ObjectAttributesReport>,
    /// The status/result block.
    pub io_status: Inspected<IoStatusReport>,
}

impl CallReport {
    /// Write the rendered report into `sink`.
    ///
    /// # Errors
    /// Returns [`crate::Error::SinkError`] if the sink fails.
    pub fn render<W: io::Write>(&self, sink: &mut W) -> Result<()> {
        write!(sink, "{self}")?;
        Ok(())
    }
}

fn write_header<T>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    field: &Inspected<T>,
) -> fmt::Result {
    match field {
        Inspected::Absent => writeln!(f, "{label}: (null)"),
        Inspected::Invalid { addr } => writeln!(f, "{label} @ {addr:#x}: invalid"),
        Inspected::Valid(_) => Ok(()),
    }
}

fn write_security_field(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    field: &SecurityField,
) -> fmt::Result {
    match field.state {
        PointerState::Null => writeln!(f, "  {label}: (null)"),
        state => writeln!(f, "  {label} @ {:#x}: {state}", field.addr),
    }
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &Inspected<NameReport>) -> fmt::Result {
    match name {
        Inspected::Absent => writeln!(f, "  ObjectName: (null)"),
        Inspected::Invalid { addr } => writeln!(f, "  ObjectName @ {addr:#x}: invalid"),
        Inspected::Valid(name) => {
            writeln!(f, "  ObjectName @ {:#x}: valid", name.addr)?;
            writeln!(
                f,
                "    Length: {} bytes, MaximumLength: {} bytes",
                name.declared_length, name.maximum_length
            )?;
            match name.buffer_state {
                PointerState::Null => writeln!(f, "    Buffer: (null)"),
                PointerState::Invalid => {
                    writeln!(f, "    Buffer @ {:#x}: invalid", name.buffer)
                }
                PointerState::Valid => {
                    writeln!(
                        f,
                        "    Buffer @ {:#x}: valid, {} characters",
                        name.buffer, name.char_count
                    )?;
                    let text = name.text.as_deref().unwrap_or("");
                    if name.truncated {
                        writeln!(f, "    Text: {text:?} (clamped to validated extent)")
                    } else {
                        writeln!(f, "    Text: {text:?}")
                    }
                }
            }
        }
    }
}

impl fmt::Display for CallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==================== intercepted call ====================")?;

        if let Some(request) = &self.request {
            write!(f, "request: access={:#x}", request.desired_access)?;
            match request.disposition {
                Some(disposition) => {
                    write!(f, " disposition={disposition} ({:#x})", request.disposition_raw)?;
                }
                None => write!(f, " disposition=unknown ({:#x})", request.disposition_raw)?,
            }
            writeln!(f, " options={} ({:#x})", request.options, request.options_raw)?;
        }

        write_header(f, "handle slot", &self.handle_slot)?;
        if let Some(slot) = self.handle_slot.value() {
            writeln!(
                f,
                "handle slot @ {:#x}: valid, current value {:#x}",
                slot.addr, slot.value
            )?;
        }

        write_header(f, "OBJECT_ATTRIBUTES", &self.attributes)?;
        if let Some(oa) = self.attributes.value() {
            writeln!(f, "OBJECT_ATTRIBUTES @ {:#x}: valid", oa.addr)?;
            writeln!(f, "  Length: {}", oa.length)?;
            writeln!(f, "  RootDirectory: {:#x}", oa.root_directory)?;
            writeln!(f, "  Attributes: {} ({:#x})", oa.attributes, oa.attributes_raw)?;
            write_name(f, &oa.name)?;
            write_security_field(f, "SecurityDescriptor", &oa.security_descriptor)?;
            write_security_field(
                f,
                "SecurityQualityOfService",
                &oa.security_quality_of_service,
            )?;
        }

        write_header(f, "IO_STATUS_BLOCK", &self.io_status)?;
        if let Some(iosb) = self.io_status.value() {
            writeln!(f, "IO_STATUS_BLOCK @ {:#x}: valid", iosb.addr)?;
            writeln!(f, "  Status: {:#x}", iosb.status)?;
            writeln!(f, "  Information: {:#x}", iosb.information)?;
        }

        writeln!(f, "==========================================================")
    }
}

/// Outcome of one best-effort write target in the simulate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The target validated and the write landed.
    Written {
        /// Address written to.
        addr: usize,
        /// Number of bytes written.
        len: usize,
    },
    /// The target failed validation; zero bytes were written.
    Skipped {
        /// The rejected address.
        addr: usize,
        /// Why it was rejected (null or invalid).
        state: PointerState,
    },
}

impl WriteOutcome {
    /// Whether the write landed.
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written { .. })
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Written { addr, len } => {
                write!(f, "@ {addr:#x}: written ({len} bytes)")
            }
            WriteOutcome::Skipped { addr, state } => {
                write!(f, "@ {addr:#x}: skipped ({state})")
            }
        }
    }
}

/// Per-target outcomes of one completion simulation.
///
/// `None` means the target was not part of this simulation; `Some` records exactly what
/// happened. There is no rollback: earlier targets stay written even when a later target
/// is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationReport {
    /// Sentinel handle write into the handle slot.
    pub handle_slot: Option<WriteOutcome>,
    /// Sentinel status/result write into the status block.
    pub io_status: Option<WriteOutcome>,
    /// Fill of the data buffer prefix.
    pub data_prefix: Option<WriteOutcome>,
    /// Fault-injection write into the attributes block length field.
    pub corrupted_length: Option<WriteOutcome>,
}

impl SimulationReport {
    /// Whether every requested target was actually written.
    #[must_use]
    pub fn complete(&self) -> bool {
        [
            &self.handle_slot,
            &self.io_status,
            &self.data_prefix,
            &self.corrupted_length,
        ]
        .into_iter()
        .flatten()
        .all(WriteOutcome::is_written)
    }

    /// Write the rendered report into `sink`.
    ///
    /// # Errors
    /// Returns [`crate::Error::SinkError`] if the sink fails.
    pub fn render<W: io::Write>(&self, sink: &mut W) -> Result<()> {
        write!(sink, "{self}")?;
        Ok(())
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------------------- simulated completion ----------------")?;
        let targets = [
            ("handle slot", &self.handle_slot),
            ("IO_STATUS_BLOCK", &self.io_status),
            ("data prefix", &self.data_prefix),
            ("corrupted Length", &self.corrupted_length),
        ];
        for (label, outcome) in targets {
            if let Some(outcome) = outcome {
                writeln!(f, "{label} {outcome}")?;
            }
        }
        writeln!(f, "==========================================================")
    }
}
