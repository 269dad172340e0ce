use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;

use crate::config::{LatencyConfig, SeedConfig};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{LatencyKind, simulate};

pub const ADMIN_USERNAME: &str = "admin";

/// 内存中的全部数据表
#[derive(Debug, Clone, PartialEq)]
struct Store {
    users: BTreeMap<i64, User>,
    next_user_id: i64,
    prizes: Vec<Prize>,
    /// 最新的记录在最前
    wins: Vec<WinRecord>,
}

/// 初始奖品目录
pub fn seed_prizes() -> Vec<Prize> {
    vec![
        Prize::new("PRZ100", "₹100", Rarity::Common),
        Prize::new("COFFEE1", "Free Coffee", Rarity::Common),
        Prize::new("XPBOOST", "Bonus XP", Rarity::Uncommon),
        Prize::new("TRYAGAIN", "Try Again", Rarity::Common),
        Prize::new("PRZ005", "₹5", Rarity::Common),
        Prize::new("JACKPOT", "Jackpot!", Rarity::Legendary),
    ]
}

/// 初始用户（预置管理员 + 一个普通用户）
pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            username: ADMIN_USERNAME.to_string(),
            spins: 10,
            is_admin: true,
        },
        User {
            id: 2,
            username: "user1".to_string(),
            spins: 3,
            is_admin: false,
        },
    ]
}

impl Store {
    fn seeded() -> Self {
        let users: BTreeMap<i64, User> = seed_users().into_iter().map(|u| (u.id, u)).collect();
        let next_user_id = users.keys().max().copied().unwrap_or(0) + 1;
        Self {
            users,
            next_user_id,
            prizes: seed_prizes(),
            wins: Vec::new(),
        }
    }

    fn user_mut(&mut self, user_id: i64) -> AppResult<&mut User> {
        self.users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

fn pick_index(len: usize) -> usize {
    rand::rng().random_range(0..len)
}

/// 模拟后端：所有操作都在随机延迟后完成
///
/// 每个操作先等待模拟延迟，再在同一把写锁内完成读-改-写，
/// 多个调用方并发访问时不会丢失更新。
#[derive(Clone)]
pub struct MockBackend {
    store: Arc<RwLock<Store>>,
    latency: LatencyConfig,
    seed: SeedConfig,
}

impl MockBackend {
    pub fn new(latency: LatencyConfig, seed: SeedConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::seeded())),
            latency,
            seed,
        }
    }

    pub fn without_latency() -> Self {
        Self::new(LatencyConfig::none(), SeedConfig::default())
    }

    // -----------------------------
    // 登录 / 登出
    // -----------------------------

    /// 按用户名查找用户，不存在则创建（不校验 code）
    pub async fn login(&self, username: &str, _code: &str) -> AppResult<User> {
        simulate(&self.latency, LatencyKind::Read).await;
        let mut store = self.store.write().await;

        if let Some(existing) = store.users.values().find(|u| u.username == username) {
            log::debug!("Login for existing user {} ({})", existing.id, existing.username);
            return Ok(existing.clone());
        }

        let id = store.next_user_id;
        store.next_user_id += 1;
        let user = User {
            id,
            username: username.to_string(),
            spins: self.seed.default_spins,
            is_admin: username == ADMIN_USERNAME,
        };
        store.users.insert(id, user.clone());
        log::info!("Created user {id} ({username}) with {} spins", user.spins);
        Ok(user)
    }

    pub async fn logout(&self) -> AppResult<()> {
        simulate(&self.latency, LatencyKind::Read).await;
        Ok(())
    }

    // -----------------------------
    // 用户
    // -----------------------------

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        simulate(&self.latency, LatencyKind::Read).await;
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        simulate(&self.latency, LatencyKind::Read).await;
        let store = self.store.read().await;
        Ok(store.users.get(&user_id).cloned())
    }

    /// 剩余次数；用户不存在时为 0
    pub async fn get_spins(&self, user_id: i64) -> AppResult<i64> {
        simulate(&self.latency, LatencyKind::Read).await;
        let store = self.store.read().await;
        Ok(store.users.get(&user_id).map(|u| u.spins).unwrap_or(0))
    }

    /// 直接设置剩余次数
    pub async fn update_spins(&self, user_id: i64, spins: i64) -> AppResult<User> {
        if spins < 0 {
            return Err(AppError::ValidationError(
                "Spin count must not be negative".to_string(),
            ));
        }
        simulate(&self.latency, LatencyKind::Read).await;
        let mut store = self.store.write().await;
        let user = store.user_mut(user_id)?;
        user.spins = spins;
        log::info!("Set spins of user {user_id} to {spins}");
        Ok(user.clone())
    }

    /// 为用户增加（或扣减）次数，结果不低于 0
    pub async fn give_spins(&self, user_id: i64, amount: i64) -> AppResult<User> {
        simulate(&self.latency, LatencyKind::Read).await;
        let mut store = self.store.write().await;
        let user = store.user_mut(user_id)?;
        user.spins = user.spins.saturating_add(amount).max(0);
        log::info!("Gave {amount} spins to user {user_id}, now {}", user.spins);
        Ok(user.clone())
    }

    // -----------------------------
    // 奖品目录
    // -----------------------------

    pub async fn fetch_prizes(&self) -> AppResult<Vec<Prize>> {
        simulate(&self.latency, LatencyKind::Read).await;
        let store = self.store.read().await;
        Ok(store.prizes.clone())
    }

    /// 添加奖品；id 已存在时原位替换
    pub async fn add_prize(&self, prize: Prize) -> AppResult<Vec<Prize>> {
        simulate(&self.latency, LatencyKind::Read).await;
        let mut store = self.store.write().await;
        match store.prizes.iter_mut().find(|p| p.id == prize.id) {
            Some(existing) => {
                log::info!("Replaced prize {}", prize.id);
                *existing = prize;
            }
            None => {
                log::info!("Added prize {} ({})", prize.id, prize.rarity);
                store.prizes.push(prize);
            }
        }
        Ok(store.prizes.clone())
    }

    pub async fn remove_prize(&self, prize_id: &str) -> AppResult<Vec<Prize>> {
        simulate(&self.latency, LatencyKind::Read).await;
        let mut store = self.store.write().await;
        let before = store.prizes.len();
        store.prizes.retain(|p| p.id != prize_id);
        if store.prizes.len() != before {
            log::info!("Removed prize {prize_id}");
        }
        Ok(store.prizes.clone())
    }

    // -----------------------------
    // 抽奖
    // -----------------------------

    /// 抽奖 (Spin)
    ///
    /// 1. 校验用户存在且剩余次数 > 0
    /// 2. 在当前目录中等概率抽取一个奖品（与稀有度无关）
    /// 3. 扣减一次并追加中奖记录
    ///
    /// 任一校验失败时状态不变。
    pub async fn perform_spin(&self, user_id: i64) -> AppResult<SpinResult> {
        simulate(&self.latency, LatencyKind::Spin).await;
        let mut store = self.store.write().await;

        let spins = store.user_mut(user_id)?.spins;
        if spins <= 0 {
            return Err(AppError::NoSpinsLeft);
        }
        if store.prizes.is_empty() {
            return Err(AppError::InternalError(
                "No prizes configured".to_string(),
            ));
        }

        let prize = store.prizes[pick_index(store.prizes.len())].clone();

        let user = store.user_mut(user_id)?;
        user.spins -= 1;
        let spins_left = user.spins;

        let record = WinRecord::new(user_id, &prize);
        store.wins.insert(0, record.clone());

        log::info!(
            "User {user_id} won {} ({}), {spins_left} spins left",
            prize.id,
            prize.rarity
        );

        Ok(SpinResult {
            prize,
            spins_left,
            record,
        })
    }

    /// 最近的中奖记录（倒序，最多 limit 条）
    pub async fn fetch_previous_wins(
        &self,
        user_id: i64,
        limit: usize,
    ) -> AppResult<Vec<WinRecord>> {
        simulate(&self.latency, LatencyKind::Read).await;
        let store = self.store.read().await;
        Ok(store
            .wins
            .iter()
            .filter(|r| r.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    /// 恢复初始数据
    pub async fn reset(&self) -> AppResult<()> {
        simulate(&self.latency, LatencyKind::Read).await;
        let mut store = self.store.write().await;
        *store = Store::seeded();
        log::info!("Mock backend reset to seed data");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> MockBackend {
        MockBackend::new(LatencyConfig::default(), SeedConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_creates_user_with_default_allotment() {
        let api = backend();
        let alice = api.login("alice", "x").await.unwrap();
        assert_eq!(alice.username, "alice");
        assert_eq!(alice.spins, 5);
        assert!(!alice.is_admin);
        assert_eq!(alice.id, 3);

        // 再次登录返回同一用户
        let again = api.login("alice", "other-code").await.unwrap();
        assert_eq!(again, alice);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_admin_returns_seeded_user() {
        let api = backend();
        let admin = api.login("admin", "x").await.unwrap();
        assert_eq!(admin.id, 1);
        assert_eq!(admin.spins, 10);
        assert!(admin.is_admin);
        assert_eq!(api.list_users().await.unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_operations_take_simulated_latency() {
        let api = backend();
        let start = tokio::time::Instant::now();
        api.fetch_prizes().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= std::time::Duration::from_millis(80));
        assert!(elapsed <= std::time::Duration::from_millis(320));

        let user = api.login("alice", "x").await.unwrap();
        let start = tokio::time::Instant::now();
        api.perform_spin(user.id).await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spin_decrements_and_records() {
        let api = backend();
        let user = api.login("alice", "x").await.unwrap();
        let catalog = api.fetch_prizes().await.unwrap();

        let result = api.perform_spin(user.id).await.unwrap();
        assert_eq!(result.spins_left, user.spins - 1);
        assert_eq!(api.get_spins(user.id).await.unwrap(), user.spins - 1);
        assert!(catalog.contains(&result.prize));
        assert_eq!(result.record.user_id, user.id);
        assert_eq!(result.record.prize_id, result.prize.id);
        assert_eq!(result.record.prize_name, result.prize.full_name);

        let wins = api.fetch_previous_wins(user.id, 50).await.unwrap();
        assert_eq!(wins, vec![result.record]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spin_with_zero_spins_fails_without_side_effects() {
        let api = backend();
        let user = api.login("alice", "x").await.unwrap();
        api.update_spins(user.id, 0).await.unwrap();

        for _ in 0..3 {
            assert_eq!(api.perform_spin(user.id).await, Err(AppError::NoSpinsLeft));
        }
        assert_eq!(api.get_spins(user.id).await.unwrap(), 0);
        assert!(api.fetch_previous_wins(user.id, 50).await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spin_unknown_user_is_not_found() {
        let api = backend();
        assert!(matches!(api.perform_spin(999).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_spin_then_no_spins_left() {
        let api = backend();
        let user = api.login("bob", "x").await.unwrap();
        api.update_spins(user.id, 1).await.unwrap();

        let first = api.perform_spin(user.id).await.unwrap();
        assert_eq!(first.spins_left, 0);
        assert_eq!(api.perform_spin(user.id).await, Err(AppError::NoSpinsLeft));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spin_with_empty_catalog_leaves_state_unchanged() {
        let api = backend();
        for prize in seed_prizes() {
            api.remove_prize(&prize.id).await.unwrap();
        }
        let result = api.perform_spin(1).await;
        assert!(matches!(result, Err(AppError::InternalError(_))));
        assert_eq!(api.get_spins(1).await.unwrap(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_win_history_newest_first_and_limited() {
        let api = backend();
        let admin = api.login("admin", "x").await.unwrap();
        let other = api.login("carol", "x").await.unwrap();

        let mut records = Vec::new();
        for _ in 0..4 {
            records.push(api.perform_spin(admin.id).await.unwrap().record);
            api.perform_spin(other.id).await.unwrap();
        }

        let wins = api.fetch_previous_wins(admin.id, 3).await.unwrap();
        assert_eq!(wins.len(), 3);
        assert!(wins.iter().all(|r| r.user_id == admin.id));
        let expected: Vec<_> = records.iter().rev().take(3).cloned().collect();
        assert_eq!(wins, expected);

        assert!(api.fetch_previous_wins(admin.id, 0).await.unwrap().is_empty());
        assert!(api.fetch_previous_wins(404, 10).await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_snapshot_survives_catalog_edits() {
        let api = backend();
        let record = api.perform_spin(1).await.unwrap().record;
        api.remove_prize(&record.prize_id).await.unwrap();

        let wins = api.fetch_previous_wins(1, 10).await.unwrap();
        assert_eq!(wins[0].prize_name, record.prize_name);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_and_remove_prize() {
        let api = backend();
        let prize: Prize = serde_json::from_str(r#"{"id":"X1","fullName":"Test"}"#).unwrap();

        api.add_prize(prize).await.unwrap();
        let catalog = api.fetch_prizes().await.unwrap();
        assert!(catalog.iter().any(|p| p.id == "X1"));

        let catalog = api.remove_prize("X1").await.unwrap();
        assert!(!catalog.iter().any(|p| p.id == "X1"));
        assert_eq!(api.fetch_prizes().await.unwrap(), seed_prizes());
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_prize_with_existing_id_replaces() {
        let api = backend();
        let catalog = api
            .add_prize(Prize::new("COFFEE1", "Free Tea", Rarity::Uncommon))
            .await
            .unwrap();
        assert_eq!(catalog.len(), seed_prizes().len());
        assert_eq!(catalog[1].full_name, "Free Tea");
    }

    #[tokio::test(start_paused = true)]
    async fn test_give_spins() {
        let api = backend();
        let user = api.give_spins(2, 4).await.unwrap();
        assert_eq!(user.spins, 7);

        let user = api.give_spins(2, -100).await.unwrap();
        assert_eq!(user.spins, 0);

        assert!(matches!(api.give_spins(42, 1).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_spins_rejects_negative() {
        let api = backend();
        assert!(matches!(
            api.update_spins(1, -1).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(api.update_spins(42, 1).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restores_seed() {
        let api = backend();
        let pristine = api.store.read().await.clone();

        let alice = api.login("alice", "x").await.unwrap();
        api.perform_spin(alice.id).await.unwrap();
        api.give_spins(1, 50).await.unwrap();
        api.add_prize(Prize::new("X1", "Test", Rarity::Common)).await.unwrap();
        api.remove_prize("JACKPOT").await.unwrap();

        api.reset().await.unwrap();
        assert_eq!(*api.store.read().await, pristine);
        assert_eq!(api.list_users().await.unwrap(), seed_users());
        assert_eq!(api.fetch_prizes().await.unwrap(), seed_prizes());
        assert!(api.fetch_previous_wins(alice.id, 50).await.unwrap().is_empty());

        // 重置后 id 重新从 3 开始分配
        assert_eq!(api.login("dave", "x").await.unwrap().id, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_spins_do_not_lose_updates() {
        let api = backend();
        let user = api.login("alice", "x").await.unwrap();
        api.update_spins(user.id, 3).await.unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let api = api.clone();
                tokio::spawn(async move { api.perform_spin(user.id).await })
            })
            .collect();

        let mut won = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => won += 1,
                Err(AppError::NoSpinsLeft) => rejected += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(won, 3);
        assert_eq!(rejected, 7);
        assert_eq!(api.get_spins(user.id).await.unwrap(), 0);
        assert_eq!(api.fetch_previous_wins(user.id, 50).await.unwrap().len(), 3);
    }
}
