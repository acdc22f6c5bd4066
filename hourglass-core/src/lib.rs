//! hourglass-core: task store, allocation math and the report layout engine.

pub mod allocation;
pub mod format;
pub mod layout;
pub mod palette;
pub mod store;
pub mod task;
pub mod time;

pub use allocation::Allocation;
pub use layout::{layout, distribution_order, Align, Document, DrawCommand, Page, ReportMeta, Rgb};
pub use store::{TaskError, TaskStore};
pub use task::{Budget, NewTask, Priority, Task, TaskId, TaskPatch, TimeFrame};
pub use time::{today_in, TimeError, DEFAULT_DATE_FORMAT};

/// Lay out the current contents of a store.
pub fn report(store: &TaskStore, meta: &ReportMeta) -> Document {
    let budget = store.budget();
    layout(store.tasks(), &budget, &store.allocation(), meta)
}
