//! memsize demo CLI.

use memsize::{build, init_tracing, parse_options};
use msz_report::{human_size, report};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };
    if options.help {
        print_usage();
        return;
    }

    let demo = match build(options.nodes, options.chan_cap) {
        Ok(demo) => demo,
        Err(e) => {
            eprintln!("error: failed to build the sample program: {e}");
            std::process::exit(1);
        }
    };

    let sizes = msz_scan::scan(&demo.world, demo.root);
    print!("{}", demo.world.inspect(|rt| report(&sizes, rt.pool())));
    println!();
    println!(
        "tracker: {} ({:.1}% of blocks used)",
        human_size(sizes.bitmap_size),
        sizes.bitmap_utilization * 100.0
    );
}

fn print_usage() {
    eprintln!("Usage: memsize [options]");
    eprintln!();
    eprintln!("Builds a sample program, scans it and prints a per-type memory report.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --nodes=<n>      Length of the sample linked list (default: 1000)");
    eprintln!("  --chan-cap=<n>   Capacity of the sample job channel (default: 16)");
    eprintln!("  -h, --help       Show this message");
}
