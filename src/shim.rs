//! Exported shim entry points.
//!
//! These are the symbols a host process resolves after injecting the library in place of
//! the native call. Each is a thin wrapper: convert the positional raw arguments into an
//! argument bundle, run the inspector against the host's own memory map, print the
//! reports to standard output, and hand back an NT status.
//!
//! The diagnostic text is for humans; the status code is the only machine-facing output
//! of this layer. Library consumers wanting structured results use
//! [`crate::inspect::Inspector`] directly with a sink of their choosing.

use std::io::Write;

use crate::inspect::{CreateFileArgs, Inspector, ReadFileArgs, SimulationOptions};
use crate::memory::OsMemory;
use crate::nt::{
    Handle, IoStatusBlockRaw, NtStatus, ObjectAttributesRaw, STATUS_ACCESS_VIOLATION,
    STATUS_SUCCESS,
};

fn run_create(args: &CreateFileArgs, with_request: bool, options: &SimulationOptions) -> NtStatus {
    let source = OsMemory::new();
    let inspector = Inspector::new(&source);

    let report = if with_request {
        inspector.describe_create(args)
    } else {
        inspector.describe(args.handle_slot, args.object_attributes, args.io_status)
    };
    let simulation = inspector.simulate_create(args, options);

    let stdout = std::io::stdout();
    let mut sink = stdout.lock();
    let _ = report.render(&mut sink);
    let _ = simulation.render(&mut sink);
    let _ = sink.flush();

    if simulation.complete() {
        STATUS_SUCCESS
    } else {
        STATUS_ACCESS_VIOLATION
    }
}

/// Dump-style interception point: decode and report the classic handle-slot /
/// attributes-block / status-block triple, then write the sentinel handle into the slot.
///
/// Returns [`STATUS_SUCCESS`] when the handle write landed, [`STATUS_ACCESS_VIOLATION`]
/// when the slot was null or unwritable.
///
/// # Safety
///
/// Any address may be passed, including hostile ones; nothing is dereferenced without
/// validation, so the call cannot fault. The caller must only accept that the handle
/// slot, if valid and writable, will be overwritten, and that writes into memory aliased
/// by other threads are unsequenced with respect to them.
#[no_mangle]
pub unsafe extern "system" fn ntscope_dump_object_attributes(
    handle_slot: *mut Handle,
    object_attributes: *const ObjectAttributesRaw,
    io_status: *mut IoStatusBlockRaw,
) -> NtStatus {
    let args = CreateFileArgs {
        handle_slot: handle_slot as usize,
        desired_access: 0,
        object_attributes: object_attributes as usize,
        io_status: io_status as usize,
        create_disposition: 0,
        create_options: 0,
    };
    run_create(&args, false, &SimulationOptions::handle_only())
}

/// Open-file shim, mirroring the native six-argument signature: decode and report every
/// argument, then simulate completion (sentinel handle, success status, sentinel
/// transfer count).
///
/// Returns [`STATUS_SUCCESS`] when all output writes landed, [`STATUS_ACCESS_VIOLATION`]
/// when any output pointer was rejected.
///
/// # Safety
///
/// Same contract as [`ntscope_dump_object_attributes`]: arbitrary addresses are safe to
/// pass; validated output locations will be overwritten.
#[no_mangle]
pub unsafe extern "system" fn ntscope_create_file(
    handle_slot: *mut Handle,
    desired_access: u32,
    object_attributes: *const ObjectAttributesRaw,
    io_status: *mut IoStatusBlockRaw,
    create_disposition: u32,
    create_options: u32,
) -> NtStatus {
    let args = CreateFileArgs {
        handle_slot: handle_slot as usize,
        desired_access,
        object_attributes: object_attributes as usize,
        io_status: io_status as usize,
        create_disposition,
        create_options,
    };
    run_create(&args, true, &SimulationOptions::default())
}

/// Fault-injecting variant of [`ntscope_create_file`]: additionally clobbers the
/// attributes block `length` field with `u32::MAX` to probe the caller's robustness
/// against a misbehaving shim.
///
/// # Safety
///
/// Same contract as [`ntscope_create_file`], plus the explicit destruction of the
/// `length` field when the attributes block is writable. Never use on callers that are
/// not the subject of the probe.
#[no_mangle]
pub unsafe extern "system" fn ntscope_create_file_corrupt(
    handle_slot: *mut Handle,
    desired_access: u32,
    object_attributes: *const ObjectAttributesRaw,
    io_status: *mut IoStatusBlockRaw,
    create_disposition: u32,
    create_options: u32,
) -> NtStatus {
    let args = CreateFileArgs {
        handle_slot: handle_slot as usize,
        desired_access,
        object_attributes: object_attributes as usize,
        io_status: io_status as usize,
        create_disposition,
        create_options,
    };
    run_create(&args, true, &SimulationOptions::corrupting())
}

/// Read-file shim: simulate a transfer by filling a bounded prefix of the caller's
/// buffer with the fill byte and reporting the transfer through the status block.
///
/// # Safety
///
/// Same contract as [`ntscope_dump_object_attributes`]; the buffer prefix and status
/// block are the only memory written.
#[no_mangle]
pub unsafe extern "system" fn ntscope_read_file(
    handle: Handle,
    buffer: *mut core::ffi::c_void,
    length: u32,
    io_status: *mut IoStatusBlockRaw,
) -> NtStatus {
    let source = OsMemory::new();
    let inspector = Inspector::new(&source);

    let args = ReadFileArgs {
        handle,
        buffer: buffer as usize,
        length,
        io_status: io_status as usize,
    };
    let simulation = inspector.simulate_read(&args);

    let stdout = std::io::stdout();
    let mut sink = stdout.lock();
    let _ = simulation.render(&mut sink);
    let _ = sink.flush();

    if simulation.complete() {
        STATUS_SUCCESS
    } else {
        STATUS_ACCESS_VIOLATION
    }
}
