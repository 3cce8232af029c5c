//! 用户注册表
//!
//! 使用 DashMap 实现的内存用户注册表，按用户名索引。
//! 模拟外部用户目录，核心流水线只通过 `Arc<User>` 访问用户。

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tour_guide::User;

/// 内存用户注册表
///
/// 支持高并发读写，克隆后共享同一份数据。
#[derive(Debug, Default, Clone)]
pub struct UserStore {
    data: Arc<DashMap<String, Arc<User>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加用户
    ///
    /// 用户名已存在时保留原用户，返回 false
    pub fn add_user(&self, user: User) -> bool {
        match self.data.entry(user.user_name().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(user));
                true
            }
        }
    }

    /// 批量添加用户，返回实际添加的数量
    pub fn add_users<I>(&self, users: I) -> usize
    where
        I: IntoIterator<Item = User>,
    {
        users
            .into_iter()
            .map(|user| self.add_user(user))
            .filter(|added| *added)
            .count()
    }

    /// 按用户名获取用户
    pub fn get_user(&self, user_name: &str) -> Option<Arc<User>> {
        self.data.get(user_name).map(|v| Arc::clone(v.value()))
    }

    /// 所有用户（顺序不保证）
    pub fn all_users(&self) -> Vec<Arc<User>> {
        self.data
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// 按条件筛选用户
    pub fn users_by<F>(&self, predicate: F) -> Vec<Arc<User>>
    where
        F: Fn(&User) -> bool,
    {
        self.data
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn contains(&self, user_name: &str) -> bool {
        self.data.contains_key(user_name)
    }

    pub fn clear(&self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(name: &str) -> User {
        User::new(Uuid::new_v4(), name, "000", format!("{}@tourGuide.com", name))
    }

    #[test]
    fn test_add_and_get_user() {
        let store = UserStore::new();

        assert!(store.add_user(user("internalUser0")));
        let found = store.get_user("internalUser0").unwrap();
        assert_eq!(found.user_name(), "internalUser0");
        assert!(store.get_user("nobody").is_none());
    }

    #[test]
    fn test_add_user_keeps_existing() {
        let store = UserStore::new();
        let first = user("jon");
        let first_id = first.user_id();

        assert!(store.add_user(first));
        assert!(!store.add_user(user("jon")));

        assert_eq!(store.count(), 1);
        assert_eq!(store.get_user("jon").unwrap().user_id(), first_id);
    }

    #[test]
    fn test_all_users_and_filter() {
        let store = UserStore::new();
        let added = store.add_users((0..5).map(|i| user(&format!("internalUser{}", i))));
        assert_eq!(added, 5);

        assert_eq!(store.all_users().len(), 5);
        let filtered = store.users_by(|u| u.user_name().ends_with('3'));
        assert_eq!(filtered.len(), 1);
        assert!(store.contains("internalUser3"));
    }

    #[test]
    fn test_clone_shares_data() {
        let store = UserStore::new();
        let shared = store.clone();

        store.add_user(user("jon"));
        assert!(shared.contains("jon"));

        shared.clear();
        assert_eq!(store.count(), 0);
    }
}
