//! OS-backed validation tests: the same contract the fixture tests pin down, exercised
//! against the host kernel's real memory map.
//!
//! The interesting cases need precise region boundaries, so the Linux tests build them
//! with `mmap`/`mprotect` (a read-write page bracketed by `PROT_NONE` pages) and the
//! Windows tests with `VirtualAlloc`. If the decoder ever read past a validated extent
//! here, the bracketing no-access page would turn the bug into a hard fault.

#[cfg(target_os = "linux")]
mod linux {
    use std::mem::size_of;
    use std::ptr;

    use ntscope::prelude::*;

    fn page_size() -> usize {
        unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
    }

    /// Three anonymous pages; the outer two are `PROT_NONE`, the middle one read-write.
    struct BracketedPage {
        base: *mut u8,
        page: usize,
    }

    impl BracketedPage {
        fn new() -> Self {
            let page = page_size();
            let base = unsafe {
                libc::mmap(
                    ptr::null_mut(),
                    3 * page,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };
            assert_ne!(base, libc::MAP_FAILED);
            let base = base.cast::<u8>();
            unsafe {
                assert_eq!(libc::mprotect(base.cast(), page, libc::PROT_NONE), 0);
                assert_eq!(
                    libc::mprotect(base.add(2 * page).cast(), page, libc::PROT_NONE),
                    0
                );
            }
            BracketedPage { base, page }
        }

        fn middle(&self) -> usize {
            self.base as usize + self.page
        }
    }

    impl Drop for BracketedPage {
        fn drop(&mut self) {
            unsafe {
                libc::munmap(self.base.cast(), 3 * self.page);
            }
        }
    }

    #[test]
    fn middle_page_validates_exactly_to_its_boundary() {
        let pages = BracketedPage::new();
        let source = OsMemory::new();
        let validator = Validator::new(&source);
        let mid = pages.middle();

        assert!(validator.validate(mid, 1));
        assert!(validator.validate(mid, pages.page));
        assert!(!validator.validate(mid, pages.page + 1));
        assert!(validator.validate(mid + pages.page - 1, 1));
        assert!(!validator.validate(mid + pages.page - 1, 2));
    }

    #[test]
    fn no_access_neighbors_are_rejected() {
        let pages = BracketedPage::new();
        let source = OsMemory::new();
        let validator = Validator::new(&source);

        assert!(!validator.validate(pages.base as usize, 1));
        assert!(!validator.validate(pages.middle() + pages.page, 1));
        assert_eq!(
            validator.check(pages.base as usize, 1),
            PointerState::Invalid
        );
    }

    #[test]
    fn anonymous_map_is_committed_and_readable() {
        let map = memmap2::MmapMut::map_anon(64 * 1024).unwrap();
        let source = OsMemory::new();
        let validator = Validator::new(&source);

        assert!(validator.validate(map.as_ptr() as usize, map.len()));
    }

    #[test]
    fn low_addresses_are_unmapped() {
        let source = OsMemory::new();
        let validator = Validator::new(&source);

        assert!(!validator.validate(0x10, 1));
    }

    #[test]
    fn name_decode_clamps_at_the_page_boundary() {
        let pages = BracketedPage::new();
        let text: Vec<u16> = "test".encode_utf16().collect();
        let buffer_addr = pages.middle() + pages.page - 8;
        unsafe {
            ptr::copy_nonoverlapping(text.as_ptr(), buffer_addr as *mut u16, text.len());
        }

        let name = UnicodeStringRaw {
            length: 0x1000,
            maximum_length: 0x1000,
            buffer: buffer_addr,
        };
        let oa = ObjectAttributesRaw {
            length: size_of::<ObjectAttributesRaw>() as u32,
            root_directory: 0,
            object_name: std::ptr::from_ref(&name) as usize,
            attributes: ObjectFlags::CASE_INSENSITIVE.bits(),
            security_descriptor: 0,
            security_quality_of_service: 0,
        };

        let source = OsMemory::new();
        let inspector = Inspector::new(&source);
        let report = inspector.describe(0, std::ptr::from_ref(&oa) as usize, 0);

        let name_report = report
            .attributes
            .value()
            .expect("stack-resident attributes should decode")
            .name
            .value()
            .expect("name view should decode")
            .clone();

        // A read past the validated extent would have faulted on the PROT_NONE page.
        assert_eq!(name_report.text.as_deref(), Some("test"));
        assert!(name_report.truncated);
        assert_eq!(name_report.char_count, 4);
    }

    #[test]
    fn simulation_lands_in_a_real_mapping() {
        let pages = BracketedPage::new();
        let slot_addr = pages.middle();
        let iosb_addr = pages.middle() + 64;

        let source = OsMemory::new();
        let inspector = Inspector::new(&source);

        let args = CreateFileArgs {
            handle_slot: slot_addr,
            desired_access: 0,
            object_attributes: 0,
            io_status: iosb_addr,
            create_disposition: 1,
            create_options: 0,
        };
        let simulation = inspector.simulate_create(&args, &SimulationOptions::default());
        assert!(simulation.complete());

        let slot = unsafe { ptr::read(slot_addr as *const Handle) };
        let iosb = unsafe { ptr::read(iosb_addr as *const IoStatusBlockRaw) };
        assert_eq!(slot, SENTINEL_HANDLE);
        assert_eq!(iosb.status, STATUS_SUCCESS as usize);
        assert_eq!(iosb.information, SENTINEL_INFORMATION);
    }
}

#[cfg(windows)]
mod windows {
    use core::ffi::c_void;

    use ntscope::prelude::*;
    use windows_sys::Win32::System::Memory::{
        VirtualAlloc, VirtualFree, MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_GUARD,
        PAGE_NOACCESS, PAGE_READONLY, PAGE_READWRITE,
    };

    struct Allocation {
        base: *mut c_void,
    }

    impl Allocation {
        fn new(size: usize, allocation_type: u32, protect: u32) -> Self {
            let base =
                unsafe { VirtualAlloc(std::ptr::null(), size, allocation_type, protect) };
            assert!(!base.is_null());
            Allocation { base }
        }

        fn addr(&self) -> usize {
            self.base as usize
        }
    }

    impl Drop for Allocation {
        fn drop(&mut self) {
            unsafe {
                VirtualFree(self.base, 0, MEM_RELEASE);
            }
        }
    }

    #[test]
    fn committed_read_write_pages_validate() {
        let alloc = Allocation::new(0x1000, MEM_COMMIT | MEM_RESERVE, PAGE_READWRITE);
        let source = OsMemory::new();
        let validator = Validator::new(&source);

        assert!(validator.validate(alloc.addr(), 0x1000));
        assert!(validator.checked_mut(alloc.addr(), 8).is_some());
    }

    #[test]
    fn no_access_pages_are_rejected() {
        let alloc = Allocation::new(0x1000, MEM_COMMIT | MEM_RESERVE, PAGE_NOACCESS);
        let source = OsMemory::new();
        let validator = Validator::new(&source);

        assert!(!validator.validate(alloc.addr(), 1));
    }

    #[test]
    fn reserved_but_uncommitted_pages_are_rejected() {
        let alloc = Allocation::new(0x1000, MEM_RESERVE, PAGE_NOACCESS);
        let source = OsMemory::new();
        let validator = Validator::new(&source);

        assert!(!validator.validate(alloc.addr(), 1));
        assert_eq!(validator.check(alloc.addr(), 1), PointerState::Invalid);
    }

    #[test]
    fn guard_pages_are_rejected_without_tripping_them() {
        let alloc =
            Allocation::new(0x1000, MEM_COMMIT | MEM_RESERVE, PAGE_READWRITE | PAGE_GUARD);
        let source = OsMemory::new();
        let validator = Validator::new(&source);

        // Twice: a tripped guard page would validate the second time.
        assert!(!validator.validate(alloc.addr(), 1));
        assert!(!validator.validate(alloc.addr(), 1));
    }

    #[test]
    fn read_only_pages_refuse_write_capabilities() {
        let alloc = Allocation::new(0x1000, MEM_COMMIT | MEM_RESERVE, PAGE_READONLY);
        let source = OsMemory::new();
        let validator = Validator::new(&source);

        assert!(validator.validate(alloc.addr(), 8));
        assert!(validator.checked_mut(alloc.addr(), 8).is_none());
        assert_eq!(validator.check_write(alloc.addr(), 8), PointerState::Invalid);
    }
}
