//! Listener registry shared by history media and the router.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle returned when registering a listener, used to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Ordered set of callbacks taking `&A`.
///
/// `emit` snapshots the set before calling out, so callbacks may register,
/// remove, or trigger further emits without deadlocking.
pub(crate) struct Listeners<A: ?Sized> {
	next_id: AtomicU64,
	entries: Mutex<Vec<(ListenerId, Callback<A>)>>,
}

impl<A: ?Sized> Default for Listeners<A> {
	fn default() -> Self {
		Self {
			next_id: AtomicU64::new(0),
			entries: Mutex::new(Vec::new()),
		}
	}
}

impl<A: ?Sized> Listeners<A> {
	pub(crate) fn add(&self, callback: Callback<A>) -> ListenerId {
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.entries.lock().push((id, callback));
		id
	}

	pub(crate) fn remove(&self, id: ListenerId) -> bool {
		let mut entries = self.entries.lock();
		let before = entries.len();
		entries.retain(|(entry_id, _)| *entry_id != id);
		entries.len() != before
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub(crate) fn emit(&self, arg: &A) {
		let snapshot: Vec<Callback<A>> = self
			.entries
			.lock()
			.iter()
			.map(|(_, callback)| Arc::clone(callback))
			.collect();
		for callback in snapshot {
			callback(arg);
		}
	}
}
