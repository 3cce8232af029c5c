//! 存储模块
//!
//! 提供模拟外部用户目录的内存存储。

pub mod user_store;

pub use user_store::UserStore;
