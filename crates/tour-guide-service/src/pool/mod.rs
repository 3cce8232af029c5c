//! 有界工作池与批量等待
//!
//! 所有外部调用（定位、距离计算、积分查询）都在工作池中执行。
//! 两个工作池（位置追踪、奖励计算）各自限制并发槽位，共享 Tokio 的阻塞线程池，
//! 因此即使面对数万用户也不会无限制地创建线程。

mod bulk;
mod worker_pool;

pub use bulk::{BulkOutcome, join_with_deadline};
pub use worker_pool::WorkerPool;
