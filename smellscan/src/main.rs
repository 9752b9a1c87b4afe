//! Main binary entry point for smellscan.
//!
//! This binary delegates to the shared `entry_point::run_with_args()` function
//! so it behaves exactly like the `smellscan` binary of `smellscan-cli`.

use anyhow::Result;

fn main() -> Result<()> {
    let code = smellscan::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
