//! Launch abstraction for data-parallel passes.
//!
//! Every algorithmic step in this crate is a *launch*: one closure evaluated
//! independently for each of `n` elements. Launches never overlap, and the
//! host only inspects a launch's output after it has returned, so all
//! continue/stop decisions are taken on fully materialised results.
//!
//! Two launch shapes cover every pass:
//!
//! - [`Device::launch_map`]: one output value per element, in element order.
//! - [`Device::launch_rows`]: each element takes ownership of one item,
//!   usually a disjoint `&mut` slice (the CSR fill pass writes through these).
//!
//! A panic inside a launch is caught and reported as
//! [`Error::Accelerator`], separate from algorithmic outcomes.

use crate::error::{Error, Result};
use std::panic::{catch_unwind, AssertUnwindSafe};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::Arc;

/// Where launches execute.
#[derive(Debug, Clone)]
pub enum Device {
    /// Sequentially on the calling thread.
    Host,
    /// On a rayon pool. `None` uses the global pool.
    #[cfg(feature = "parallel")]
    Rayon(Option<Arc<rayon::ThreadPool>>),
}

impl Default for Device {
    fn default() -> Self {
        #[cfg(feature = "parallel")]
        {
            Device::Rayon(None)
        }
        #[cfg(not(feature = "parallel"))]
        {
            Device::Host
        }
    }
}

impl Device {
    /// Sequential device.
    pub fn host() -> Self {
        Device::Host
    }

    /// Dedicated pool with `threads` workers (0 lets rayon decide).
    ///
    /// Without the `parallel` feature this returns [`Device::Host`].
    pub fn with_threads(threads: usize) -> Result<Self> {
        #[cfg(feature = "parallel")]
        {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("hitgraph-{i}"))
                .build()
                .map_err(|e| Error::Accelerator {
                    kernel: "thread_pool",
                    message: e.to_string(),
                })?;
            Ok(Device::Rayon(Some(Arc::new(pool))))
        }
        #[cfg(not(feature = "parallel"))]
        {
            let _ = threads;
            Ok(Device::Host)
        }
    }

    /// Whether launches may run concurrently.
    pub fn is_parallel(&self) -> bool {
        !matches!(self, Device::Host)
    }

    /// Evaluate `f` for every element in `0..n`; outputs are in element order.
    pub fn launch_map<T, F>(&self, kernel: &'static str, n: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        guarded(kernel, || match self {
            Device::Host => (0..n).map(&f).collect::<Vec<T>>(),
            #[cfg(feature = "parallel")]
            Device::Rayon(pool) => {
                let run = || (0..n).into_par_iter().map(&f).collect::<Vec<T>>();
                match pool {
                    Some(pool) => pool.install(run),
                    None => run(),
                }
            }
        })
    }

    /// Evaluate `f` once per owned item (typically a disjoint `&mut` row
    /// slice); outputs are in item order.
    pub fn launch_rows<T, R, F>(&self, kernel: &'static str, rows: Vec<T>, f: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(usize, T) -> R + Sync + Send,
    {
        guarded(kernel, move || match self {
            Device::Host => rows
                .into_iter()
                .enumerate()
                .map(|(i, row)| f(i, row))
                .collect::<Vec<R>>(),
            #[cfg(feature = "parallel")]
            Device::Rayon(pool) => {
                let run = move || {
                    rows.into_par_iter()
                        .enumerate()
                        .map(|(i, row)| f(i, row))
                        .collect::<Vec<R>>()
                };
                match pool {
                    Some(pool) => pool.install(run),
                    None => run(),
                }
            }
        })
    }
}

fn guarded<R>(kernel: &'static str, body: impl FnOnce() -> R) -> Result<R> {
    catch_unwind(AssertUnwindSafe(body)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "launch panicked".to_string());
        tracing::error!(kernel, %message, "launch failed");
        Error::Accelerator { kernel, message }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> Vec<Device> {
        vec![Device::host(), Device::default(), Device::with_threads(2).unwrap()]
    }

    #[test]
    fn test_launch_map_preserves_order() {
        for device in devices() {
            let out = device.launch_map("square", 100, |i| i * i).unwrap();
            assert_eq!(out.len(), 100);
            assert!(out.iter().enumerate().all(|(i, &v)| v == i * i));
        }
    }

    #[test]
    fn test_launch_rows_writes_disjoint_slices() {
        for device in devices() {
            let mut buf = vec![0u32; 10];
            let (a, b) = buf.split_at_mut(3);
            let lens = device
                .launch_rows("fill", vec![a, b], |i, row: &mut [u32]| {
                    for v in row.iter_mut() {
                        *v = i as u32 + 1;
                    }
                    row.len()
                })
                .unwrap();
            assert_eq!(lens, vec![3, 7]);
            assert_eq!(buf, vec![1, 1, 1, 2, 2, 2, 2, 2, 2, 2]);
        }
    }

    #[test]
    fn test_panic_becomes_accelerator_error() {
        for device in devices() {
            let err = device
                .launch_map("explode", 4, |i| {
                    if i == 2 {
                        panic!("bad element");
                    }
                    i
                })
                .unwrap_err();
            assert!(err.is_fatal());
            match err {
                Error::Accelerator { kernel, .. } => assert_eq!(kernel, "explode"),
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_launch() {
        for device in devices() {
            let out: Vec<usize> = device.launch_map("noop", 0, |i| i).unwrap();
            assert!(out.is_empty());
        }
    }
}
