#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use msz_scan::{scan, TypeSize};

use super::*;

/// Config static size plus what it owns:
/// name 12, tags 4*16 + 12, samples 64*4, index 2*(16+8) + 8, extra 16.
const CONFIG_BASE: u64 = 136 + 12 + 76 + 256 + 56 + 16;

#[test]
fn demo_accounting() {
    let demo = build(100, 8).unwrap();
    let sizes = scan(&demo.world, demo.root);

    assert_eq!(sizes.get(demo.node), Some(TypeSize { total: 1600, count: 100 }));
    assert_eq!(
        sizes.get(demo.config),
        Some(TypeSize {
            total: CONFIG_BASE + 8 * 8,
            count: 1,
        })
    );
    assert_eq!(sizes.total, 8 + CONFIG_BASE + 64 + 1600);
}

#[test]
fn empty_list_and_unbuffered_channel() {
    let demo = build(0, 0).unwrap();
    let sizes = scan(&demo.world, demo.root);

    assert_eq!(sizes.get(demo.node), None);
    assert_eq!(
        sizes.get(demo.config).map(|s| s.total),
        Some(CONFIG_BASE - 56)
    );
}

#[test]
fn report_lists_every_billed_type() {
    let demo = build(10, 2).unwrap();
    let sizes = scan(&demo.world, demo.root);
    let table = demo.world.inspect(|rt| msz_report::report(&sizes, rt.pool()));

    let names: Vec<&str> = table.lines().map(|l| l.split_whitespace().next().unwrap()).collect();
    assert_eq!(names, vec!["ALL", "Config", "Node", "*Config"]);
}
