use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 玩家
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    /// 剩余抽奖次数（不为负）
    pub spins: i64,
    #[serde(default)]
    pub is_admin: bool,
}

/// 局部更新：只覆盖提供的字段
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub username: Option<String>,
    pub spins: Option<i64>,
    pub is_admin: Option<bool>,
}

impl UserPatch {
    pub fn spins(spins: i64) -> Self {
        Self {
            spins: Some(spins),
            ..Default::default()
        }
    }
}

impl User {
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(spins) = patch.spins {
            self.spins = spins.max(0);
        }
        if let Some(is_admin) = patch.is_admin {
            self.is_admin = is_admin;
        }
    }

    pub fn can_spin(&self) -> bool {
        self.spins > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    /// 游戏码（不做校验）
    #[schema(example = "x")]
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GiveSpinsRequest {
    /// 可为负数
    #[schema(example = 3)]
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateSpinsRequest {
    #[schema(example = 10)]
    pub spins: i64,
}

/// `GET /users/{id}/spins` 的返回数据
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpinBalance {
    pub user_id: i64,
    pub spins: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: 3,
            username: "alice".into(),
            spins: 5,
            is_admin: false,
        }
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut user = alice();
        user.apply(UserPatch::spins(4));
        assert_eq!(user.spins, 4);
        assert_eq!(user.username, "alice");
        assert!(!user.is_admin);

        // 重复应用同一补丁结果不变
        user.apply(UserPatch::spins(4));
        assert_eq!(user, User { spins: 4, ..alice() });
    }

    #[test]
    fn test_apply_clamps_negative_spins() {
        let mut user = alice();
        user.apply(UserPatch::spins(-2));
        assert_eq!(user.spins, 0);
        assert!(!user.can_spin());
    }

    #[test]
    fn test_user_json_uses_contract_field_names() {
        let json = serde_json::to_value(alice()).unwrap();
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["spins"], 5);
    }
}
