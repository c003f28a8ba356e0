//! Scan entry points.

use msz_rt::{Addr, StoppedWorld, Value, World};
use msz_types::{Idx, Pool, Tag};

use crate::scanner::Scanner;
use crate::Sizes;

/// The value a scan starts from: a non-null pointer of type `ty` to `addr`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Root {
    pub ty: Idx,
    pub addr: Addr,
}

impl Root {
    pub fn new(ty: Idx, addr: Addr) -> Self {
        Self { ty, addr }
    }
}

/// Stop the world and measure everything reachable from `root`.
///
/// The root pointer itself is billed to its type as one word, and the
/// value it points to is billed to the pointee type.
///
/// # Panics
///
/// Panics if the root is null, if its type is not a pointer type, or if the
/// graph references storage outside the heap. The root checks run before the
/// world stops, and the world resumes in every case.
#[tracing::instrument(level = "debug", skip_all, fields(root = %root.addr))]
pub fn scan(world: &World, root: Root) -> Sizes {
    assert!(!root.addr.is_null(), "scan root must not be null");
    world.inspect(|rt| check_root_type(rt.pool(), root.ty));
    let stopped = world.stop_the_world("memsize scan");
    scan_stopped(&stopped, root)
}

/// Measure everything reachable from `root` in an already stopped world.
///
/// # Panics
///
/// Same conditions as [`scan`].
pub fn scan_stopped(world: &StoppedWorld<'_>, root: Root) -> Sizes {
    check_root_type(world.pool(), root.ty);
    assert!(!root.addr.is_null(), "scan root must not be null");

    let word = root.addr.get().to_le_bytes();
    let mut scanner = Scanner::new(world);
    scanner.scan(None, Value::new(root.ty, &word), true);
    let sizes = scanner.finish();

    tracing::debug!(
        total = sizes.total,
        types = sizes.by_type.len(),
        bitmap_size = sizes.bitmap_size,
        "scan complete"
    );
    sizes
}

fn check_root_type(pool: &Pool, ty: Idx) {
    assert!(
        matches!(pool.tag(ty), Tag::Ptr),
        "scan root must be a pointer, got {}",
        pool.name(ty)
    );
}
