//! Raw CPU counters for the `cpu_cycles` measurement mode.
//!
//! x86_64 reads the time-stamp counter fenced by `LFENCE` so neighbouring
//! instructions cannot be reordered across the read. aarch64 reads the
//! virtual counter `CNTVCT_EL0`, a fixed-frequency tick that userspace can
//! access on every core.

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
compile_error!("the cpu_cycles feature needs x86_64 or aarch64; build with --features use_time");

/// Current counter value.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub fn read_cycles() -> u64 {
    use std::arch::x86_64::{_mm_lfence, _rdtsc};
    // SAFETY: LFENCE and RDTSC are part of baseline x86_64.
    unsafe {
        _mm_lfence();
        let tsc = _rdtsc();
        _mm_lfence();
        tsc
    }
}

/// Current counter value.
#[cfg(target_arch = "aarch64")]
#[inline(always)]
pub fn read_cycles() -> u64 {
    let ticks: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all supported OSes.
    unsafe {
        std::arch::asm!(
            "isb",
            "mrs {ticks}, cntvct_el0",
            ticks = out(reg) ticks,
            options(nomem, nostack, preserves_flags),
        );
    }
    ticks
}
