use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Prize, WinRecord};

/// 抽奖（Spin）结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    pub prize: Prize,
    pub spins_left: i64,
    pub record: WinRecord,
}
