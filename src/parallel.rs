use anyhow::Result;

/// Without the `mt` feature `f` runs on the calling thread.
#[cfg(feature = "mt")]
pub fn install<R, F>(threads: usize, f: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
    Ok(pool.install(f))
}

#[cfg(not(feature = "mt"))]
pub fn install<R, F>(threads: usize, f: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    let _ = threads;
    Ok(f())
}

pub fn worker_count(threads: usize) -> usize {
    #[cfg(feature = "mt")]
    {
        if threads == 0 {
            return rayon::current_num_threads();
        }
        threads
    }
    #[cfg(not(feature = "mt"))]
    {
        let _ = threads;
        1
    }
}
