//! The mutate path: write a real call's observable side effects into caller memory.
//!
//! Every target is validated for the full written extent before the write, attempted
//! exactly once, and recorded individually. There is no rollback: if the status block is
//! unwritable after the handle slot was already written, the handle write stays and the
//! report says so. An unwritable target always surfaces as a `Skipped` outcome, never as
//! a silent no-op.
//!
//! The length-corruption write exists to probe how robust the intercepted caller is
//! against a shim handing back garbage. It destroys the caller's view of the block, so
//! it is opt-in through [`SimulationOptions::corrupt_length`]; no default path performs
//! it.

use std::mem::size_of;

use crate::inspect::report::{SimulationReport, WriteOutcome};
use crate::inspect::{CreateFileArgs, Inspector, ReadFileArgs};
use crate::memory::RawLayout;
use crate::nt::{Handle, IoStatusBlockRaw, STATUS_SUCCESS};

/// Sentinel resource identifier written into the handle slot.
pub const SENTINEL_HANDLE: Handle = 1000;

/// Fixed transfer count reported through the status block by the open-file shim.
pub const SENTINEL_INFORMATION: usize = FILL_PREFIX_LEN;

/// Fill byte used for simulated data transfers.
pub const FILL_BYTE: u8 = 0xCC;

/// Upper bound of the simulated data transfer prefix, in bytes.
pub const FILL_PREFIX_LEN: usize = 16;

/// Which side effects one completion simulation performs.
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    /// Write [`SENTINEL_HANDLE`] into the handle slot.
    pub write_handle: bool,
    /// Write success status and [`SENTINEL_INFORMATION`] into the status block.
    pub write_io_status: bool,
    /// Fault injection: clobber the attributes block `length` field with `u32::MAX`.
    pub corrupt_length: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions {
            write_handle: true,
            write_io_status: true,
            corrupt_length: false,
        }
    }
}

impl SimulationOptions {
    /// The default effects plus the length-corruption probe.
    #[must_use]
    pub fn corrupting() -> Self {
        SimulationOptions {
            corrupt_length: true,
            ..SimulationOptions::default()
        }
    }

    /// Only the handle-slot write, as performed by the dump-style interception point.
    #[must_use]
    pub fn handle_only() -> Self {
        SimulationOptions {
            write_handle: true,
            write_io_status: false,
            corrupt_length: false,
        }
    }
}

impl Inspector<'_> {
    /// Simulate completion of an open-file request.
    #[must_use]
    pub fn simulate_create(
        &self,
        args: &CreateFileArgs,
        options: &SimulationOptions,
    ) -> SimulationReport {
        let handle_slot = options
            .write_handle
            .then(|| self.write_value(args.handle_slot, SENTINEL_HANDLE));
        let io_status = options.write_io_status.then(|| {
            self.write_value(
                args.io_status,
                IoStatusBlockRaw {
                    status: STATUS_SUCCESS as usize,
                    information: SENTINEL_INFORMATION,
                },
            )
        });
        let corrupted_length = options
            .corrupt_length
            .then(|| self.write_value(args.object_attributes, u32::MAX));

        SimulationReport {
            handle_slot,
            io_status,
            data_prefix: None,
            corrupted_length,
        }
    }

    /// Simulate completion of a read request: fill a bounded prefix of the caller's
    /// buffer with [`FILL_BYTE`] and report the transfer through the status block.
    #[must_use]
    pub fn simulate_read(&self, args: &ReadFileArgs) -> SimulationReport {
        let fill_len = (args.length as usize).min(FILL_PREFIX_LEN);
        let data_prefix = self.fill_prefix(args.buffer, fill_len);
        let transferred = match data_prefix {
            WriteOutcome::Written { len, .. } => len,
            WriteOutcome::Skipped { .. } => 0,
        };
        let io_status = self.write_value(
            args.io_status,
            IoStatusBlockRaw {
                status: STATUS_SUCCESS as usize,
                information: transferred,
            },
        );

        SimulationReport {
            handle_slot: None,
            io_status: Some(io_status),
            data_prefix: Some(data_prefix),
            corrupted_length: None,
        }
    }

    /// Single best-effort typed write, validated for the full extent of `T`.
    fn write_value<T: RawLayout>(&self, addr: usize, value: T) -> WriteOutcome {
        let len = size_of::<T>();
        match self.validator.checked_mut(addr, len) {
            Some(ptr) => match ptr.write(value) {
                Ok(()) => WriteOutcome::Written { addr, len },
                Err(_) => WriteOutcome::Skipped {
                    addr,
                    state: self.validator.check_write(addr, len),
                },
            },
            None => WriteOutcome::Skipped {
                addr,
                state: self.validator.check_write(addr, len),
            },
        }
    }

    fn fill_prefix(&self, addr: usize, len: usize) -> WriteOutcome {
        match self.validator.checked_mut(addr, len) {
            Some(ptr) => {
                ptr.fill(FILL_BYTE);
                WriteOutcome::Written { addr, len }
            }
            None => WriteOutcome::Skipped {
                addr,
                state: self.validator.check_write(addr, len),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FixtureMemory, PointerState};
    use crate::nt::ObjectAttributesRaw;

    fn create_args(handle_slot: usize, object_attributes: usize, io_status: usize) -> CreateFileArgs {
        CreateFileArgs {
            handle_slot,
            desired_access: 0,
            object_attributes,
            io_status,
            create_disposition: 1,
            create_options: 0,
        }
    }

    #[test]
    fn completion_writes_both_sentinels() {
        let mut slot: Handle = 0;
        let mut iosb = IoStatusBlockRaw {
            status: usize::MAX,
            information: usize::MAX,
        };
        let slot_addr = std::ptr::from_mut(&mut slot) as usize;
        let iosb_addr = std::ptr::from_mut(&mut iosb) as usize;
        let fixture = FixtureMemory::new()
            .with_struct_mut(&mut slot)
            .with_struct_mut(&mut iosb);
        let inspector = Inspector::new(&fixture);

        let report = inspector.simulate_create(
            &create_args(slot_addr, 0, iosb_addr),
            &SimulationOptions::default(),
        );

        assert!(report.complete());
        assert_eq!(slot, SENTINEL_HANDLE);
        assert_eq!(iosb.status, STATUS_SUCCESS as usize);
        assert_eq!(iosb.information, SENTINEL_INFORMATION);
    }

    #[test]
    fn invalid_target_is_skipped_and_reported() {
        let fixture = FixtureMemory::new();
        let inspector = Inspector::new(&fixture);

        let report = inspector.simulate_create(
            &create_args(0xBAD_0000, 0, 0),
            &SimulationOptions::default(),
        );

        assert!(!report.complete());
        assert_eq!(
            report.handle_slot,
            Some(WriteOutcome::Skipped {
                addr: 0xBAD_0000,
                state: PointerState::Invalid,
            })
        );
        assert_eq!(
            report.io_status,
            Some(WriteOutcome::Skipped {
                addr: 0,
                state: PointerState::Null,
            })
        );
    }

    #[test]
    fn read_only_target_is_not_written() {
        let slot: Handle = 7;
        let slot_addr = std::ptr::from_ref(&slot) as usize;
        let fixture = FixtureMemory::new().with_struct(&slot);
        let inspector = Inspector::new(&fixture);

        let report = inspector.simulate_create(
            &create_args(slot_addr, 0, 0),
            &SimulationOptions::handle_only(),
        );

        assert!(!report.complete());
        assert_eq!(slot, 7);
    }

    #[test]
    fn corruption_is_opt_in() {
        let mut oa = ObjectAttributesRaw {
            length: 48,
            root_directory: 0,
            object_name: 0,
            attributes: 0,
            security_descriptor: 0,
            security_quality_of_service: 0,
        };
        let oa_addr = std::ptr::from_mut(&mut oa) as usize;

        {
            let fixture = FixtureMemory::new().with_struct_mut(&mut oa);
            let inspector = Inspector::new(&fixture);
            let report = inspector
                .simulate_create(&create_args(0, oa_addr, 0), &SimulationOptions::default());
            assert_eq!(report.corrupted_length, None);
        }
        assert_eq!(oa.length, 48);

        {
            let fixture = FixtureMemory::new().with_struct_mut(&mut oa);
            let inspector = Inspector::new(&fixture);
            let report = inspector
                .simulate_create(&create_args(0, oa_addr, 0), &SimulationOptions::corrupting());
            assert_eq!(
                report.corrupted_length,
                Some(WriteOutcome::Written { addr: oa_addr, len: 4 })
            );
        }
        assert_eq!(oa.length, u32::MAX);
        assert_eq!(oa.attributes, 0);
    }

    #[test]
    fn read_simulation_fills_a_bounded_prefix() {
        let mut buffer = [0u8; 64];
        let mut iosb = IoStatusBlockRaw {
            status: 0,
            information: 0,
        };
        let buffer_addr = buffer.as_mut_ptr() as usize;
        let iosb_addr = std::ptr::from_mut(&mut iosb) as usize;
        let fixture = FixtureMemory::new()
            .with_writable(&mut buffer)
            .with_struct_mut(&mut iosb);
        let inspector = Inspector::new(&fixture);

        let report = inspector.simulate_read(&ReadFileArgs {
            handle: SENTINEL_HANDLE,
            buffer: buffer_addr,
            length: 64,
            io_status: iosb_addr,
        });

        assert!(report.complete());
        assert!(buffer[..FILL_PREFIX_LEN].iter().all(|&b| b == FILL_BYTE));
        assert!(buffer[FILL_PREFIX_LEN..].iter().all(|&b| b == 0));
        assert_eq!(iosb.information, FILL_PREFIX_LEN);
    }

    #[test]
    fn short_read_buffers_bound_the_fill() {
        let mut buffer = [0u8; 4];
        let mut iosb = IoStatusBlockRaw {
            status: 0,
            information: 0,
        };
        let buffer_addr = buffer.as_mut_ptr() as usize;
        let iosb_addr = std::ptr::from_mut(&mut iosb) as usize;
        let fixture = FixtureMemory::new()
            .with_writable(&mut buffer)
            .with_struct_mut(&mut iosb);
        let inspector = Inspector::new(&fixture);

        let report = inspector.simulate_read(&ReadFileArgs {
            handle: SENTINEL_HANDLE,
            buffer: buffer_addr,
            length: 4,
            io_status: iosb_addr,
        });

        assert!(report.complete());
        assert_eq!(buffer, [FILL_BYTE; 4]);
        assert_eq!(iosb.information, 4);
    }
}
