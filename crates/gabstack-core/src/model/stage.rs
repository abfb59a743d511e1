//! ステージ定義

use serde::{Deserialize, Serialize};
use std::fmt;

/// デプロイステージ
///
/// 元の構成ではステージ名は任意の文字列で、"develop" との等値判定しか
/// 行っていなかった。既知のステージを列挙し、それ以外は `Other` として
/// ラベルを保持する。パースは必ず成功する（総写像）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    /// 開発環境（UATシークレットを参照）
    Develop,
    /// 本番環境
    Prod,
    /// 上記以外のステージ（staging など）。ラベルをそのまま保持する
    Other(String),
}

impl Stage {
    /// ステージ名からパース（失敗しない）
    pub fn parse(s: &str) -> Self {
        match s {
            "develop" => Stage::Develop,
            "prod" => Stage::Prod,
            other => Stage::Other(other.to_string()),
        }
    }

    /// 元のステージ名
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Develop => "develop",
            Stage::Prod => "prod",
            Stage::Other(label) => label,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Stage {
    fn from(s: String) -> Self {
        Stage::parse(&s)
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.as_str().to_string()
    }
}

impl From<&str> for Stage {
    fn from(s: &str) -> Self {
        Stage::parse(s)
    }
}
