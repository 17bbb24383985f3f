use anyhow::Result;

#[cfg(feature = "mt")]
use rayon::prelude::*;

/// Maps every item and collects results in input order. With the `mt`
/// feature the work is spread over a dedicated pool (`threads == 0` lets
/// rayon pick); output is identical either way.
pub fn map_ordered<T, R, F>(items: &[T], threads: usize, f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    #[cfg(feature = "mt")]
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
        Ok(pool.install(|| items.par_iter().map(&f).collect()))
    }

    #[cfg(not(feature = "mt"))]
    {
        let _ = threads;
        Ok(items.iter().map(f).collect())
    }
}

/// Additive partial results that can be merged in any order.
pub trait Mergeable: Default {
    fn merge(&mut self, other: &Self);
}

pub fn merge_all<'a, M, I>(parts: I) -> M
where
    M: Mergeable + 'a,
    I: IntoIterator<Item = &'a M>,
{
    let mut acc = M::default();
    for part in parts {
        acc.merge(part);
    }
    acc
}
