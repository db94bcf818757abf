mod task;

pub use task::{Priority, Status, Task, current_timestamp};
