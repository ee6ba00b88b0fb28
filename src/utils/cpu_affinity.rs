//! Pin the measuring thread to one core.
//!
//! Moving between cores mid-sample pollutes both caches and counters (the
//! TSC of two cores is not guaranteed to agree). On Linux the guard pins
//! the thread to the core it is already running on and restores the
//! previous mask on drop. Other platforms get a guard that does nothing.

#[cfg(target_os = "linux")]
mod platform {
    pub type Mask = libc::cpu_set_t;

    pub fn current_cpu() -> Option<usize> {
        // SAFETY: no arguments, returns -1 on failure.
        let cpu = unsafe { libc::sched_getcpu() };
        usize::try_from(cpu).ok()
    }

    pub fn get_mask() -> Option<Mask> {
        // SAFETY: `set` is a properly sized, zero-initialised cpu_set_t.
        unsafe {
            let mut set: Mask = std::mem::zeroed();
            (libc::sched_getaffinity(0, std::mem::size_of::<Mask>(), &mut set) == 0).then_some(set)
        }
    }

    pub fn set_mask(set: &Mask) -> bool {
        // SAFETY: `set` points to a valid cpu_set_t of the given size.
        unsafe { libc::sched_setaffinity(0, std::mem::size_of::<Mask>(), set) == 0 }
    }

    pub fn single_core_mask(core: usize) -> Mask {
        // SAFETY: CPU_ZERO/CPU_SET only write inside the set.
        unsafe {
            let mut set: Mask = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(core, &mut set);
            set
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    #[derive(Clone, Copy)]
    pub struct Mask;

    pub fn current_cpu() -> Option<usize> {
        None
    }
    pub fn get_mask() -> Option<Mask> {
        None
    }
    pub fn set_mask(_set: &Mask) -> bool {
        false
    }
    pub fn single_core_mask(_core: usize) -> Mask {
        Mask
    }
}

/// Core the calling thread is running on, where the OS reports it.
pub fn current_cpu() -> Option<usize> {
    platform::current_cpu()
}

/// RAII guard: pins on creation, restores the previous affinity on drop.
pub struct CpuPinGuard {
    core: Option<usize>,
    previous: Option<platform::Mask>,
}

impl CpuPinGuard {
    /// Pin to the current core. If that is not possible the guard is inert.
    pub fn new() -> Self {
        let inert = Self {
            core: None,
            previous: None,
        };
        let (Some(core), Some(previous)) = (platform::current_cpu(), platform::get_mask()) else {
            return inert;
        };
        if !platform::set_mask(&platform::single_core_mask(core)) {
            return inert;
        }
        Self {
            core: Some(core),
            previous: Some(previous),
        }
    }

    /// Core this guard pinned to, if pinning succeeded.
    pub fn core_id(&self) -> Option<usize> {
        self.core
    }

    pub fn is_pinned(&self) -> bool {
        self.core.is_some()
    }
}

impl Default for CpuPinGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CpuPinGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if !platform::set_mask(&previous) {
                tracing::warn!("failed to restore CPU affinity after measurement");
            }
        }
    }
}
