use super::model::User;
use async_trait::async_trait;
use dashmap::DashMap;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Option<User>;
    async fn save(&self, user: User);
}

/// Users kept in process memory for the lifetime of the server.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> Option<User> {
        self.users.get(id).map(|user| user.clone())
    }

    async fn save(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }
}
