//! The decode path: classify pointers, decode validated structures, report everything.
//!
//! Decode order follows the dependency structure: the attributes block is decoded first,
//! and only a valid block gets its nested name view and security pointers examined. The
//! declared sizes are taken from the block header, but the nested addresses themselves
//! are re-validated independently before any read. The status block is decoded on its
//! own, so a hostile attributes block cannot suppress it.

use std::mem::size_of;

use widestring::U16String;

use crate::inspect::report::{
    CallReport, HandleSlot, Inspected, IoStatusReport, NameReport, ObjectAttributesReport,
    RequestInfo, SecurityField,
};
use crate::inspect::{CreateFileArgs, Inspector};
use crate::memory::{PointerState, RawLayout};
use crate::nt::{Handle, IoStatusBlockRaw, ObjectAttributesRaw, ObjectFlags, UnicodeStringRaw};

impl Inspector<'_> {
    /// Decode the full argument set of an open-file request.
    #[must_use]
    pub fn describe_create(&self, args: &CreateFileArgs) -> CallReport {
        CallReport {
            request: Some(RequestInfo::new(
                args.desired_access,
                args.create_disposition,
                args.create_options,
            )),
            handle_slot: self.inspect_handle_slot(args.handle_slot),
            attributes: self.inspect_attributes(args.object_attributes),
            io_status: self.inspect_io_status(args.io_status),
        }
    }

    /// Decode a handle-slot / attributes / status-block triple without request context.
    ///
    /// This is the dump flavor used by interception points that only observe.
    #[must_use]
    pub fn describe(
        &self,
        handle_slot: usize,
        object_attributes: usize,
        io_status: usize,
    ) -> CallReport {
        CallReport {
            request: None,
            handle_slot: self.inspect_handle_slot(handle_slot),
            attributes: self.inspect_attributes(object_attributes),
            io_status: self.inspect_io_status(io_status),
        }
    }

    /// Classify `addr` and copy a `T` out of it when valid.
    fn read_validated<T: RawLayout>(&self, addr: usize) -> Inspected<T> {
        if addr == 0 {
            return Inspected::Absent;
        }
        let Some(ptr) = self.validator.checked(addr, size_of::<T>()) else {
            return Inspected::Invalid { addr };
        };
        match ptr.read::<T>() {
            Ok(value) => Inspected::Valid(value),
            Err(_) => Inspected::Invalid { addr },
        }
    }

    fn inspect_handle_slot(&self, addr: usize) -> Inspected<HandleSlot> {
        self.read_validated::<Handle>(addr)
            .map(|value| HandleSlot { addr, value })
    }

    fn inspect_attributes(&self, addr: usize) -> Inspected<ObjectAttributesReport> {
        let raw = match self.read_validated::<ObjectAttributesRaw>(addr) {
            Inspected::Valid(raw) => raw,
            Inspected::Absent => return Inspected::Absent,
            Inspected::Invalid { addr } => return Inspected::Invalid { addr },
        };

        Inspected::Valid(ObjectAttributesReport {
            addr,
            length: raw.length,
            root_directory: raw.root_directory,
            attributes_raw: raw.attributes,
            attributes: ObjectFlags::from_attributes(raw.attributes),
            name: self.inspect_name(raw.object_name),
            security_descriptor: self.probe_pointer_field(raw.security_descriptor),
            security_quality_of_service: self.probe_pointer_field(raw.security_quality_of_service),
        })
    }

    /// Security pointers are reported, never decoded: a single-byte probe of the base
    /// page is all the judgment the report carries.
    fn probe_pointer_field(&self, addr: usize) -> SecurityField {
        SecurityField {
            addr,
            state: self.validator.check(addr, 1),
        }
    }

    fn inspect_name(&self, addr: usize) -> Inspected<NameReport> {
        self.read_validated::<UnicodeStringRaw>(addr)
            .map(|raw| self.decode_name(addr, raw))
    }

    fn decode_name(&self, addr: usize, raw: UnicodeStringRaw) -> NameReport {
        let mut report = NameReport {
            addr,
            declared_length: raw.length,
            maximum_length: raw.maximum_length,
            buffer: raw.buffer,
            buffer_state: PointerState::Null,
            text: None,
            char_count: 0,
            truncated: false,
        };
        if raw.buffer == 0 {
            return report;
        }

        // The declared length is caller-controlled; the clamp bounds the read to the
        // extent the validator actually approved.
        match self.validator.clamped(raw.buffer, raw.length as usize) {
            None => report.buffer_state = PointerState::Invalid,
            Some((ptr, truncated)) => {
                let bytes = ptr.bytes();
                // Whole wide characters only; integer division drops a trailing odd byte.
                let words: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();

                report.buffer_state = PointerState::Valid;
                report.char_count = words.len();
                report.text = Some(U16String::from_vec(words).to_string_lossy());
                report.truncated = truncated;
            }
        }
        report
    }

    fn inspect_io_status(&self, addr: usize) -> Inspected<IoStatusReport> {
        self.read_validated::<IoStatusBlockRaw>(addr)
            .map(|raw| IoStatusReport {
                addr,
                status: raw.status,
                information: raw.information,
            })
    }
}
