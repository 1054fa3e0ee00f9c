use std::thread::available_parallelism;

use eyre::Result;

// Positive values are capped by the number of cores, zero means a single thread,
// negative values count backwards from the number of cores (-1 = all cores).
fn resolve(requested: isize, cores: isize) -> usize {
    if requested > 0 {
        requested.min(cores) as usize
    } else if requested < 0 {
        (cores + requested + 1).max(1) as usize
    } else {
        1
    }
}

/// Number of worker threads to use for the requested amount of parallelism.
pub fn available(requested: isize) -> Result<usize> {
    let cores = available_parallelism()?.get() as isize;
    Ok(resolve(requested, cores))
}
