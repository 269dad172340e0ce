use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::{User, UserPatch};
use crate::services::MockBackend;
use crate::utils::validate_username;

/// 会话状态：LoggedOut -> LoggedIn(User) -> LoggedOut
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn(User),
}

/// Resets the loading flag when the request finishes, whatever the outcome.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 当前页面的登录会话，显式传给需要它的组件
#[derive(Clone)]
pub struct Session {
    backend: MockBackend,
    state: Arc<RwLock<SessionState>>,
    loading: Arc<AtomicBool>,
}

impl Session {
    pub fn new(backend: MockBackend) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(SessionState::LoggedOut)),
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn backend(&self) -> &MockBackend {
        &self.backend
    }

    /// 登录；失败时会话保持原状态并把错误返回给调用方
    pub async fn login(&self, username: &str, code: &str) -> AppResult<User> {
        let username = validate_username(username)?;
        let _loading = LoadingGuard::start(&self.loading);

        match self.backend.login(&username, code).await {
            Ok(user) => {
                log::info!("Session logged in as {} ({})", user.username, user.id);
                *self.state.write().await = SessionState::LoggedIn(user.clone());
                Ok(user)
            }
            Err(e) => {
                log::warn!("Login for {username} failed: {e}");
                Err(e)
            }
        }
    }

    pub async fn logout(&self) -> AppResult<()> {
        let _loading = LoadingGuard::start(&self.loading);
        self.backend.logout().await?;
        *self.state.write().await = SessionState::LoggedOut;
        log::info!("Session logged out");
        Ok(())
    }

    /// 合并字段到当前用户（不请求后端）；未登录时不做任何事
    pub async fn set_user(&self, patch: UserPatch) -> Option<User> {
        let mut state = self.state.write().await;
        match &mut *state {
            SessionState::LoggedIn(user) => {
                user.apply(patch);
                Some(user.clone())
            }
            SessionState::LoggedOut => None,
        }
    }

    /// 从后端重新读取当前用户；用户已不存在时本地登出
    pub async fn refresh(&self) -> AppResult<Option<User>> {
        let Some(current) = self.current_user().await else {
            return Ok(None);
        };

        let fresh = self.backend.get_user(current.id).await?;
        let mut state = self.state.write().await;
        match fresh {
            Some(user) => {
                *state = SessionState::LoggedIn(user.clone());
                Ok(Some(user))
            }
            None => {
                log::warn!("User {} no longer exists, clearing session", current.id);
                *state = SessionState::LoggedOut;
                Ok(None)
            }
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        match &*self.state.read().await {
            SessionState::LoggedIn(user) => Some(user.clone()),
            SessionState::LoggedOut => None,
        }
    }

    pub async fn is_logged_in(&self) -> bool {
        matches!(*self.state.read().await, SessionState::LoggedIn(_))
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}
