//! A sample host program.
//!
//! ```text
//! struct Node   { next: *Node, value: i64 }
//! struct Point  { x: f64, y: f64 }
//! struct Config {
//!     name: str, tags: []str, head: *Node,
//!     samples: []u32, window: []u32,   // window aliases the tail of samples
//!     index: map[str]*Node, jobs: chan *Node,
//!     extra: any,                      // holds a Point by value
//!     on_reload: fn,
//! }
//! ```

use msz_rt::{Addr, RtError, Runtime, World};
use msz_scan::Root;
use msz_types::Idx;

const TAGS: [&str; 3] = ["alpha", "beta", "gamma"];
const SAMPLES: u64 = 64;
const WINDOW: u64 = 16;
const QUEUED: usize = 3;

/// The built program and the handles needed to scan it.
pub struct Demo {
    pub world: World,
    pub root: Root,
    pub node: Idx,
    pub config: Idx,
}

/// Build the sample program with a list of `nodes` nodes and a job channel
/// of capacity `chan_cap`.
pub fn build(nodes: usize, chan_cap: u64) -> Result<Demo, RtError> {
    let mut rt = Runtime::new();

    let pool = rt.pool_mut();
    let node = pool.declare_struct("Node");
    let node_ptr = pool.ptr(node);
    pool.define_struct(node, &[("next", node_ptr), ("value", Idx::I64)])?;
    let point = pool.new_struct("Point", &[("x", Idx::F64), ("y", Idx::F64)])?;
    let strs = pool.slice(Idx::STR);
    let samples = pool.slice(Idx::U32);
    let index = pool.map(Idx::STR, node_ptr);
    let jobs = pool.chan(node_ptr);
    let config = pool.new_struct(
        "Config",
        &[
            ("name", Idx::STR),
            ("tags", strs),
            ("head", node_ptr),
            ("samples", samples),
            ("window", samples),
            ("index", index),
            ("jobs", jobs),
            ("extra", Idx::ANY),
            ("on_reload", Idx::FUNC),
        ],
    )?;
    let root_ty = pool.ptr(config);

    let cfg = rt.alloc(config)?;

    let name = rt.field(cfg, config, "name")?;
    rt.store_str(name, "memsize demo")?;

    let tags = rt.field(cfg, config, "tags")?;
    let data = rt.store_slice(tags, Idx::STR, TAGS.len() as u64, TAGS.len() as u64 + 1)?;
    for (i, tag) in (0_u64..).zip(TAGS) {
        rt.store_str(data.offset(i * 16), tag)?;
    }

    let list = build_list(&mut rt, node, nodes)?;
    let head = list.last().copied().unwrap_or(Addr::NULL);
    rt.store_ptr(rt.field(cfg, config, "head")?, head)?;

    let slot = rt.field(cfg, config, "samples")?;
    let data = rt.store_slice(slot, Idx::U32, SAMPLES * 3 / 4, SAMPLES)?;
    let slot = rt.field(cfg, config, "window")?;
    rt.store_slice_view(slot, data.offset((SAMPLES - WINDOW) * 4), WINDOW, WINDOW)?;

    let slot = rt.field(cfg, config, "index")?;
    let map = rt.store_map(slot, Idx::STR, node_ptr)?;
    if let (Some(&tail), Some(&head)) = (list.first(), list.last()) {
        for (key, target) in [("head", head), ("tail", tail)] {
            let key = str_bytes(&mut rt, key)?;
            rt.map_insert(map, &key, &target.get().to_le_bytes())?;
        }
    }

    let slot = rt.field(cfg, config, "jobs")?;
    let chan = rt.store_chan(slot, node_ptr, chan_cap)?;
    for &n in list.iter().take(QUEUED) {
        if rt.chan_len(chan)? == rt.chan_cap(chan)? {
            break;
        }
        rt.chan_send(chan, &n.get().to_le_bytes())?;
    }

    let mut at = [0; 16];
    at[..8].copy_from_slice(&1.5_f64.to_le_bytes());
    at[8..].copy_from_slice(&(-2.0_f64).to_le_bytes());
    rt.store_iface(rt.field(cfg, config, "extra")?, point, &at)?;
    rt.store_func(rt.field(cfg, config, "on_reload")?, 0x4000_1000)?;

    tracing::debug!(nodes, chan_cap, allocated = rt.heap().allocated_bytes(), "demo built");
    Ok(Demo {
        world: World::new(rt),
        root: Root::new(root_ty, cfg),
        node,
        config,
    })
}

/// Allocate `len` nodes, each pointing at the one allocated before it.
fn build_list(rt: &mut Runtime, node: Idx, len: usize) -> Result<Vec<Addr>, RtError> {
    let mut list = Vec::with_capacity(len);
    let mut next = Addr::NULL;
    for i in 0..len {
        let n = rt.alloc(node)?;
        rt.store_ptr(rt.field(n, node, "next")?, next)?;
        let value = i64::try_from(i).unwrap_or(i64::MAX);
        rt.store(rt.field(n, node, "value")?, Idx::I64, &value.to_le_bytes())?;
        list.push(n);
        next = n;
    }
    Ok(list)
}

/// Encoded `str` header for `text`, with the bytes copied into the heap.
fn str_bytes(rt: &mut Runtime, text: &str) -> Result<Vec<u8>, RtError> {
    let slot = rt.alloc(Idx::STR)?;
    rt.store_str(slot, text)?;
    Ok(rt.value_at(Idx::STR, slot)?.bytes().to_vec())
}

#[cfg(test)]
mod tests;
