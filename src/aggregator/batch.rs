//! Batch Module
//!
//! Bounded-batch fan-out of async work.

use std::future::Future;

use futures::future::join_all;
use tracing::debug;

// == Fetch Batched ==
/// Runs `f` over `inputs`, at most `concurrency_limit` at a time.
///
/// Inputs are processed in chunks: a chunk is launched together and fully
/// awaited before the next one starts. Results come back as `(input, output)`
/// pairs in input order, whatever order the futures completed in. A limit of
/// 0 behaves as 1.
pub async fn fetch_batched<I, O, F, Fut>(
    inputs: impl IntoIterator<Item = I>,
    concurrency_limit: usize,
    f: F,
) -> Vec<(I, O)>
where
    I: Clone,
    F: Fn(I) -> Fut,
    Fut: Future<Output = O>,
{
    let inputs: Vec<I> = inputs.into_iter().collect();
    let limit = concurrency_limit.max(1);
    let mut results = Vec::with_capacity(inputs.len());

    for (batch_idx, chunk) in inputs.chunks(limit).enumerate() {
        debug!(batch = batch_idx + 1, size = chunk.len(), "launching batch");

        let futures: Vec<_> = chunk.iter().cloned().map(&f).collect();
        let outputs = join_all(futures).await;

        results.extend(chunk.iter().cloned().zip(outputs));
    }

    results
}
