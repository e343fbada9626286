// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Idle-task scheduling.
//!
//! The feeder registers one recurring task while feeding is active. The
//! scheduler re-runs it whenever its loop is idle until the task returns
//! `Break` or the feeder removes it.

use std::ops::ControlFlow;

/// Identifies one scheduling of the feed task.
///
/// A new id is issued every time feeding starts, so a dispatch that races
/// with a cancellation can be recognized as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A loop that can run a task repeatedly at idle priority.
pub trait IdleScheduler {
    /// Opaque handle for a registered task.
    type Handle;

    /// Registers `task`; the loop keeps dispatching it until it breaks or is removed.
    fn add_idle(&mut self, task: TaskId) -> Self::Handle;

    /// Deregisters a task. No dispatch of it may start after this returns.
    fn remove(&mut self, handle: Self::Handle);
}

/// Handle issued by [`IdleQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdleHandle(u64);

/// Single-threaded cooperative idle loop.
///
/// Tasks are dispatched explicitly with [`IdleQueue::dispatch`], which makes
/// the feeder usable without any event loop library.
#[derive(Debug, Default)]
pub struct IdleQueue {
    next_handle: u64,
    tasks: Vec<(IdleHandle, TaskId)>,
}

impl IdleQueue {
    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, handle: IdleHandle) -> bool {
        self.tasks.iter().any(|(registered, _)| *registered == handle)
    }

    /// Runs every registered task once, in registration order.
    ///
    /// Tasks returning `Break` are deregistered. Returns the number of
    /// dispatched tasks.
    pub fn dispatch<F>(&mut self, mut run: F) -> usize
    where
        F: FnMut(TaskId) -> ControlFlow<()>,
    {
        let mut dispatched = 0;
        self.tasks.retain(|(_, task)| {
            dispatched += 1;
            run(*task).is_continue()
        });
        dispatched
    }
}

impl IdleScheduler for IdleQueue {
    type Handle = IdleHandle;

    fn add_idle(&mut self, task: TaskId) -> IdleHandle {
        let handle = IdleHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push((handle, task));
        handle
    }

    fn remove(&mut self, handle: IdleHandle) {
        self.tasks.retain(|(registered, _)| *registered != handle);
    }
}
