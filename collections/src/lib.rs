pub use self::indexed_priority_queue::IndexedPriorityQueue;
pub use self::score_heap::{Orientation, ScoreHeap};

pub mod indexed_priority_queue;
pub mod score_heap;
