//! Raw evdev-based motion event source for Linux (event-count policy)
//!
//! Reads `/dev/input/event*` directly and counts one per relative or absolute
//! motion event, which matches the discrete event stream the kernel delivers
//! for mice, trackballs and game controllers. Device discovery and naming go
//! through sysfs so no extra ioctls are needed.

use super::{CountingPolicy, DeviceError, EventSource};
use nix::libc;
use std::fs::{self, File};
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A raw input event from the kernel
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct InputEvent {
    tv_sec: i64,
    tv_usec: i64,
    event_type: u16,
    code: u16,
    value: i32,
}

const EV_REL: u16 = 0x02;
const EV_ABS: u16 = 0x03;
const INPUT_EVENT_SIZE: usize = std::mem::size_of::<InputEvent>();

/// True when a sysfs capability bitmap names at least one bit
fn bitmap_is_nonzero(caps: &str) -> bool {
    let trimmed = caps.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed
        .split_whitespace()
        .filter_map(|hex| u64::from_str_radix(hex, 16).ok())
        .any(|word| word != 0)
}

/// Check whether a device reports relative or absolute motion axes
fn is_motion_device(device_path: &Path) -> bool {
    let Some(name) = device_path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    for axis_kind in ["rel", "abs"] {
        let caps_path = format!("/sys/class/input/{}/device/capabilities/{}", name, axis_kind);
        if let Ok(caps) = fs::read_to_string(&caps_path) {
            if bitmap_is_nonzero(&caps) {
                return true;
            }
        }
    }
    false
}

/// Read the kernel-reported device name from sysfs
fn sysfs_device_name(device_path: &Path) -> Option<String> {
    let name = device_path.file_name()?.to_str()?;
    let name_path = format!("/sys/class/input/{}/device/name", name);
    let dev_name = fs::read_to_string(&name_path).ok()?;
    let trimmed = dev_name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Find all motion-capable input device nodes
fn find_motion_devices() -> Vec<PathBuf> {
    let input_dir = PathBuf::from("/dev/input");
    let mut found = Vec::new();

    if let Ok(entries) = fs::read_dir(&input_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if name.starts_with("event") && is_motion_device(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    found
}

/// Count the relative/absolute motion events in a raw read buffer
fn count_motion_events(buffer: &[u8]) -> u64 {
    let mut count = 0;
    for chunk in buffer.chunks_exact(INPUT_EVENT_SIZE) {
        let event: InputEvent = unsafe { std::ptr::read_unaligned(chunk.as_ptr() as *const InputEvent) };
        if event.event_type == EV_REL || event.event_type == EV_ABS {
            count += 1;
        }
    }
    count
}

/// One opened evdev device node
pub struct EvdevSource {
    file: File,
    name: String,
    path: PathBuf,
    buffer: Vec<u8>,
}

impl EvdevSource {
    /// Open a device node and switch it to non-blocking reads
    pub fn open(path: PathBuf) -> Result<Self, DeviceError> {
        let name = sysfs_device_name(&path)
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let file = File::open(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::PermissionDenied {
                DeviceError::PermissionDenied(path.to_string_lossy().into_owned())
            } else {
                DeviceError::Unavailable {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let fd = file.as_raw_fd();
        unsafe {
            let flags = libc::fcntl(fd, libc::F_GETFL);
            libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
        }

        Ok(Self {
            file,
            name,
            path,
            buffer: vec![0u8; INPUT_EVENT_SIZE * 64],
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait at most `timeout` for the node to become readable.
    ///
    /// Returns false on timeout and DeviceLost once the node reports an error
    /// or hangup condition.
    fn wait_readable(&self, timeout: Duration) -> Result<bool, DeviceError> {
        let mut pfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;

        let rc = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(DeviceError::Io(err));
        }
        if rc == 0 {
            return Ok(false);
        }
        if pfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Err(DeviceError::DeviceLost {
                name: self.name.clone(),
            });
        }
        Ok(true)
    }

    /// Read and count everything currently queued on the node
    fn drain(&mut self) -> Result<u64, DeviceError> {
        let mut count = 0;
        loop {
            match self.file.read(&mut self.buffer) {
                Ok(0) => break,
                Ok(bytes_read) => {
                    count += count_motion_events(&self.buffer[..bytes_read]);
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => {
                    // ENODEV once the device is unplugged
                    return Err(DeviceError::DeviceLost {
                        name: self.name.clone(),
                    });
                }
            }
        }
        Ok(count)
    }
}

impl EventSource for EvdevSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn policy(&self) -> CountingPolicy {
        CountingPolicy::DeviceEvents
    }

    fn pump(&mut self, timeout: Duration) -> Result<u64, DeviceError> {
        if !self.wait_readable(timeout)? {
            return Ok(0);
        }
        self.drain()
    }
}

/// Open every accessible motion device, skipping the ones we cannot read
pub(super) fn enumerate_motion_sources() -> Vec<Box<dyn EventSource>> {
    let mut sources: Vec<Box<dyn EventSource>> = Vec::new();

    for path in find_motion_devices() {
        match EvdevSource::open(path) {
            Ok(source) => sources.push(Box::new(source)),
            Err(DeviceError::PermissionDenied(path)) => {
                log::warn!("skipping {}: permission denied", path);
            }
            Err(e) => {
                log::warn!("skipping device: {}", e);
            }
        }
    }

    sources
}
