//! In-memory [`Database`] implementation.
//!
//! A transaction works on a snapshot of the whole [`State`] and holds the
//! exclusive access to it until dropped, so transactions are serialized.
//! The snapshot is copied back on [`Commit`], and discarded otherwise.
//!
//! [`Commit`]: common::operations::Commit

mod impls;

use std::{
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use derive_more::{Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{
        insurance::{self, NamedValues},
        plot::{Outgoing, Tenant},
        ConstructionItem, ConstructionProp, YearRangeValue,
    },
    infra::database,
};
#[cfg(doc)]
use crate::infra::Database;

/// In-memory [`Database`] client.
#[derive(Clone, Debug)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self(NonTx {
            state: Arc::default(),
            writes_left: Arc::new(AtomicUsize::new(usize::MAX)),
        })
    }

    /// Makes every write fail once the provided number of writes succeeds.
    pub fn fail_writes_after(&self, writes: usize) {
        self.0.writes_left.store(writes, Ordering::SeqCst);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Stored records.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// [`ConstructionProp`]s without their items.
    props: Vec<ConstructionProp>,

    /// [`ConstructionItem`]s in the order of their creation.
    items: Vec<ConstructionItem>,

    /// Reference rates.
    year_range_values: Vec<YearRangeValue>,

    /// Insurance line-items.
    insurance_items: Vec<insurance::Item>,

    /// Plot tenants.
    tenants: Vec<Tenant>,

    /// Plot expenses.
    outgoings: Vec<Outgoing>,

    /// Insurance pipeline parameters.
    named_values: NamedValues,
}

/// Non-transactional [`Memory`] client, committing every write at once.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// Committed [`State`].
    state: Arc<Mutex<State>>,

    /// Number of writes allowed before failing.
    writes_left: Arc<AtomicUsize>,
}

/// Transactional [`Memory`] client.
#[derive(Clone, Debug)]
pub struct Tx {
    /// Number of writes allowed before failing.
    writes_left: Arc<AtomicUsize>,

    /// Inner state of the transaction.
    inner: Arc<Mutex<TxInner>>,
}

/// Inner state of a [`Tx`].
#[derive(Debug)]
struct TxInner {
    /// Exclusive access to the committed [`State`], until committed.
    committed: Option<OwnedMutexGuard<State>>,

    /// Snapshot being modified by the transaction.
    snapshot: State,
}

/// Access to the [`State`] of a [`Memory`] client.
pub trait Storage {
    /// Reads the [`State`] with the provided function.
    fn read<R>(&self, f: impl FnOnce(&State) -> R) -> impl Future<Output = R>;

    /// Modifies the [`State`] with the provided function.
    ///
    /// # Errors
    ///
    /// If writes are configured to fail.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}

/// Consumes one allowed write.
fn consume_write(
    writes_left: &AtomicUsize,
) -> Result<(), Traced<database::Error>> {
    writes_left
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
            0 => None,
            usize::MAX => Some(n),
            n => Some(n - 1),
        })
        .map(drop)
        .map_err(|_| tracerr::new!(database::Error::from(Error::WriteFailed)))
}

impl Storage for NonTx {
    async fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&*self.state.lock().await)
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let mut state = self.state.lock().await;
        consume_write(&self.writes_left)?;
        Ok(f(&mut state))
    }
}

impl Storage for Tx {
    async fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&self.inner.lock().await.snapshot)
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let mut inner = self.inner.lock().await;
        consume_write(&self.writes_left)?;
        Ok(f(&mut inner.snapshot))
    }
}

impl Tx {
    /// Starts a new [`Tx`] on a snapshot of the [`NonTx`] client's state.
    async fn begin(client: &NonTx) -> Self {
        let committed = Arc::clone(&client.state).lock_owned().await;
        let snapshot = committed.clone();
        Self {
            writes_left: Arc::clone(&client.writes_left),
            inner: Arc::new(Mutex::new(TxInner {
                committed: Some(committed),
                snapshot,
            })),
        }
    }

    /// Copies the snapshot of this [`Tx`] back and releases the exclusive
    /// access.
    async fn commit(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(mut committed) = inner.committed.take() {
            *committed = inner.snapshot.clone();
        }
    }
}

impl<T: Storage> Storage for Memory<T> {
    fn read<R>(&self, f: impl FnOnce(&State) -> R) -> impl Future<Output = R> {
        self.0.read(f)
    }

    fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>> {
        self.0.write(f)
    }
}

/// [`Memory`] database [`Error`].
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Write failed, as configured by [`Memory::fail_writes_after()`].
    #[display("Write to `Memory` database failed")]
    WriteFailed,
}
