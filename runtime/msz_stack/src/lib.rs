//! Stack growth for deep heap graph walks.
//!
//! A reachable object graph can be arbitrarily deep: a singly linked list
//! of a million nodes is a million nested pointer dereferences for a
//! recursive scanner. Recursive entry points wrap their body in
//! [`ensure_sufficient_stack`] so the walk spills onto a freshly allocated
//! stack segment instead of overflowing the thread stack.
//!
//! On `wasm32` the wrapper is a passthrough.

/// Remaining stack below which a new segment is allocated (128 KiB).
///
/// One scanner frame is small, but a single frame can fan out into a
/// struct, slice and map dispatch before recursing again.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2 MiB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than [`RED_ZONE`] remains.
///
/// ```text
/// fn walk(&mut self, node: Addr) -> u64 {
///     ensure_sufficient_stack(|| {
///         let next = self.next_of(node);
///         if next.is_null() { 1 } else { 1 + self.walk(next) }
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; call `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
