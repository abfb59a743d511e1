//! デプロイコンテキスト定義
//!
//! 元の構成でモジュールレベル定数だった値（アカウントID、リージョン、
//! 各種ARN）を、リゾルバとビルダーに明示的に渡す不変の構造体にまとめる。

use serde::{Deserialize, Serialize};

/// デプロイ先の固定値
///
/// 全フィールドが文字列定数。リソース記述子の合成中に変更されることはない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployContext {
    /// AWSアカウントID
    pub account: String,
    /// AWSリージョン
    pub region: String,
    /// ECRリポジトリ名（サービス名の接頭辞としても使用）
    pub image_repo: String,
    /// App Runner オートスケーリング設定のARN
    pub autoscaling_configuration_arn: String,
    /// 社内VPCコネクタのARN（egress用）
    pub vpc_connector_arn: String,
    /// インターフェースエンドポイントID（ingress用、vpce-...）
    pub vpc_endpoint_id: String,
    /// 社内VPCのID
    pub vpc_id: String,
    /// UAT用シークレット名（develop ステージが参照）
    pub secret_uat: String,
    /// 本番用シークレット名
    pub secret_prod: String,
}

impl DeployContext {
    /// 社内環境の固定値
    pub fn internal() -> Self {
        Self {
            account: "123456789012".to_string(),
            region: "ap-northeast-1".to_string(),
            image_repo: "sample-gab-be".to_string(),
            autoscaling_configuration_arn:
                "arn:aws:apprunner:ap-northeast-1:123456789012:autoscalingconfiguration/internal/1/8f2b4c1d9e6a47f0a3b5c7d9e1f2a4b6"
                    .to_string(),
            vpc_connector_arn:
                "arn:aws:apprunner:ap-northeast-1:123456789012:vpcconnector/internal-connector/1/2d4f6a8c0e1b3d5f7a9c1e3b5d7f9a1c"
                    .to_string(),
            vpc_endpoint_id: "vpce-0a1b2c3d4e5f60718".to_string(),
            vpc_id: "vpc-0f9e8d7c6b5a43210".to_string(),
            secret_uat: "sample-gab-be-uat-secrets-Kx3mPa".to_string(),
            secret_prod: "sample-gab-be-prod-secrets-R7nQwd".to_string(),
        }
    }

    /// ECRイメージpull用のアクセスロールARN
    pub fn ecr_access_role_arn(&self) -> String {
        format!(
            "arn:aws:iam::{}:role/service-role/AppRunnerECRAccessRole",
            self.account
        )
    }

    /// シークレット名からSecrets ManagerのARNを組み立てる
    pub fn secret_arn(&self, name: &str) -> String {
        format!(
            "arn:aws:secretsmanager:{}:{}:secret:{}",
            self.region, self.account, name
        )
    }

    /// シークレット内の特定フィールドを指す参照
    /// （App Runner のランタイムシークレットが要求する `:field::` 形式）
    pub fn secret_field_arn(&self, name: &str, field: &str) -> String {
        format!("{}:{}::", self.secret_arn(name), field)
    }
}
