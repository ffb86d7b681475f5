/*!
 * Core Identity
 *
 * Best-effort lookup of the physical core the calling thread is running on.
 *
 * The answer is stale the moment it is returned (the scheduler may migrate the
 * thread), and some platforms have no cheap source at all. Both are normal:
 * callers get `Option<usize>` and treat `None` as "pick another way".
 */

use std::sync::Arc;

/// Source of the current core id
///
/// Implementations must be cheap enough to call on every shard access.
pub trait CoreIdSource: Send + Sync {
    /// Core the calling thread is running on, or `None` if unknown
    fn current_core(&self) -> Option<usize>;
}

/// The operating system's view of the current core
///
/// - Linux/Android: `sched_getcpu()` (vDSO, no syscall on modern kernels)
/// - Other x86/x86-64: initial APIC id from CPUID leaf 1
/// - Elsewhere: unavailable
///
/// APIC ids are not guaranteed to be dense (SMT siblings and multi-socket
/// parts leave gaps), so masking them into a shard index can crowd several
/// cores onto the same shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicalCore;

impl CoreIdSource for PhysicalCore {
    #[inline]
    fn current_core(&self) -> Option<usize> {
        physical_core_id()
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
#[inline]
fn physical_core_id() -> Option<usize> {
    nix::sched::sched_getcpu().ok()
}

#[cfg(all(
    not(any(target_os = "linux", target_os = "android")),
    any(target_arch = "x86_64", target_arch = "x86")
))]
#[inline]
#[allow(unused_unsafe)]
fn physical_core_id() -> Option<usize> {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::{__cpuid, __get_cpuid_max};
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::{__cpuid, __get_cpuid_max};

    // SAFETY: CPUID is available on every x86-64 CPU and every x86 CPU Rust
    // targets; leaf 1 is checked against the reported maximum.
    unsafe {
        let (max_leaf, _) = __get_cpuid_max(0);
        if max_leaf < 1 {
            return None;
        }
        Some((__cpuid(1).ebx >> 24) as usize)
    }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_arch = "x86_64",
    target_arch = "x86"
)))]
#[inline]
fn physical_core_id() -> Option<usize> {
    None
}

/// Source that never knows the core (forces the random fallback)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoCoreId;

impl CoreIdSource for NoCoreId {
    #[inline(always)]
    fn current_core(&self) -> Option<usize> {
        None
    }
}

/// Source that always reports the same core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCore(pub usize);

impl CoreIdSource for FixedCore {
    #[inline(always)]
    fn current_core(&self) -> Option<usize> {
        Some(self.0)
    }
}

impl<F> CoreIdSource for F
where
    F: Fn() -> Option<usize> + Send + Sync,
{
    #[inline]
    fn current_core(&self) -> Option<usize> {
        self()
    }
}

impl<S: CoreIdSource + ?Sized> CoreIdSource for Arc<S> {
    #[inline]
    fn current_core(&self) -> Option<usize> {
        (**self).current_core()
    }
}
