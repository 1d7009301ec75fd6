//! Runs two independent install steps side by side under one cancellable
//! context.

use std::future::Future;
use std::sync::Mutex;

use futures::future::join;
use tracing::debug;

use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;

/// Runs `first` and `second` concurrently.
///
/// Both steps receive a child of `ctx`. When either fails the child is
/// cancelled, so the other step stops at its next cancellation checkpoint.
/// Returns once both have finished, with the first error that occurred.
pub async fn run_both<A, FA, B, FB>(
    ctx: &InstallContext,
    first: A,
    second: B,
) -> Result<(), InstallError>
where
    A: FnOnce(InstallContext) -> FA,
    FA: Future<Output = Result<(), InstallError>>,
    B: FnOnce(InstallContext) -> FB,
    FB: Future<Output = Result<(), InstallError>>,
{
    let shared = ctx.child();
    let first_error = Mutex::new(None);

    join(
        supervise(first(shared.clone()), &shared, &first_error),
        supervise(second(shared.clone()), &shared, &first_error),
    )
    .await;

    match first_error
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
    {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn supervise<F>(step: F, shared: &InstallContext, slot: &Mutex<Option<InstallError>>)
where
    F: Future<Output = Result<(), InstallError>>,
{
    if let Err(err) = step.await {
        debug!("Step failed, cancelling sibling: {}", err);
        shared.cancel();
        let mut slot = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_none() {
            *slot = Some(err);
        }
    }
}
