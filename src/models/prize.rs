use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 稀有度（只影响庆祝效果，不影响中奖概率）
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Legendary,
}

impl Rarity {
    pub fn is_rarest(&self) -> bool {
        matches!(self, Rarity::Legendary)
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::Common => write!(f, "common"),
            Rarity::Uncommon => write!(f, "uncommon"),
            Rarity::Legendary => write!(f, "legendary"),
        }
    }
}

pub const TRY_AGAIN_PRIZE_ID: &str = "TRYAGAIN";

/// 奖品
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    /// 稳定的字符串编码，目录内唯一
    #[schema(example = "JACKPOT")]
    pub id: String,
    #[schema(example = "Jackpot!")]
    pub full_name: String,
    #[serde(default)]
    pub rarity: Rarity,
}

impl Prize {
    pub fn new(id: &str, full_name: &str, rarity: Rarity) -> Self {
        Self {
            id: id.to_string(),
            full_name: full_name.to_string(),
            rarity,
        }
    }

    /// 结果弹窗里的说明文字
    pub fn result_message(&self) -> &'static str {
        if self.id == TRY_AGAIN_PRIZE_ID {
            "Tough luck! Try again."
        } else if self.rarity.is_rarest() {
            "Legendary pull, admin owes you a trophy."
        } else {
            "Claim this prize via the rewards panel."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_rarity_defaults_to_common() {
        let prize: Prize = serde_json::from_str(r#"{"id":"X1","fullName":"Test"}"#).unwrap();
        assert_eq!(prize.rarity, Rarity::Common);
        assert_eq!(prize.full_name, "Test");
    }

    #[test]
    fn test_result_message() {
        assert_eq!(
            Prize::new("TRYAGAIN", "Try Again", Rarity::Common).result_message(),
            "Tough luck! Try again."
        );
        assert!(
            Prize::new("JACKPOT", "Jackpot!", Rarity::Legendary)
                .result_message()
                .starts_with("Legendary")
        );
        assert!(
            Prize::new("COFFEE1", "Free Coffee", Rarity::Common)
                .result_message()
                .starts_with("Claim")
        );
    }
}
