//! Scoped atomic updates.
//!
//! Multi-property geometry writes happen inside a transaction so the
//! renderer never animates between intermediate values. The guard closes
//! the transaction on drop, so every exit path commits.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default, Clone)]
pub struct Transactions {
    depth: Rc<Cell<usize>>,
    commits: Rc<Cell<u64>>,
}

impl Transactions {
    /// Open a (possibly nested) transaction.
    pub fn begin(&self) -> TransactionGuard {
        self.depth.set(self.depth.get() + 1);
        TransactionGuard {
            depth: Rc::clone(&self.depth),
            commits: Rc::clone(&self.commits),
        }
    }

    /// True while any transaction is open.
    pub fn animations_suppressed(&self) -> bool {
        self.depth.get() > 0
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Number of outermost transactions closed so far.
    pub fn commits(&self) -> u64 {
        self.commits.get()
    }
}

/// Closes its transaction when dropped.
#[must_use = "the transaction closes as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TransactionGuard {
    depth: Rc<Cell<usize>>,
    commits: Rc<Cell<u64>>,
}

impl Drop for TransactionGuard {
    fn drop(&mut self) {
        let depth = self.depth.get().saturating_sub(1);
        self.depth.set(depth);
        if depth == 0 {
            self.commits.set(self.commits.get() + 1);
            log::trace!("transaction committed");
        }
    }
}
