use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Prize;

/// 中奖记录（只追加，奖品名称为快照）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WinRecord {
    pub id: Uuid,
    pub user_id: i64,
    pub time: DateTime<Utc>,
    pub prize_id: String,
    /// 奖品名称快照，之后修改奖品目录不影响历史
    pub prize_name: String,
}

impl WinRecord {
    pub fn new(user_id: i64, prize: &Prize) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            time: Utc::now(),
            prize_id: prize.id.clone(),
            prize_name: prize.full_name.clone(),
        }
    }
}

/// 中奖记录查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct WinHistoryQuery {
    /// 返回条数上限 (默认 50)
    pub limit: Option<usize>,
}

pub const DEFAULT_WIN_HISTORY_LIMIT: usize = 50;

impl WinHistoryQuery {
    pub fn get_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_WIN_HISTORY_LIMIT)
    }
}
