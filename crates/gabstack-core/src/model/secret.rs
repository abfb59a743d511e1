//! シークレットバンドル参照

use super::context::DeployContext;
use serde::{Deserialize, Serialize};

/// ステージごとのシークレットバンドル
///
/// どちらのバンドルも同じ4フィールド（[`SECRET_FIELDS`]）を持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretSource {
    /// UAT用バンドル
    Uat,
    /// 本番用バンドル
    Prod,
}

impl SecretSource {
    /// コンテキスト上のシークレット名
    pub fn name<'a>(&self, ctx: &'a DeployContext) -> &'a str {
        match self {
            SecretSource::Uat => &ctx.secret_uat,
            SecretSource::Prod => &ctx.secret_prod,
        }
    }

    /// バンドル全体のARN
    pub fn arn(&self, ctx: &DeployContext) -> String {
        ctx.secret_arn(self.name(ctx))
    }
}

/// バンドル内のフィールドと対応する環境変数名
///
/// (環境変数名, シークレットフィールド名)。順序は元の定義のまま。
pub const SECRET_FIELDS: [(&str, &str); 4] = [
    ("DB_URL", "db_url"),
    ("AX_SO_API", "AX_SO_API"),
    ("AWS_SECRET_ACCESS_KEY", "AWS_SECRET_ACCESS_KEY"),
    ("AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"),
];
