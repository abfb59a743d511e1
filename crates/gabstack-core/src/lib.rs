//! gabstack のコアモデル
//!
//! sample-gab-be バックエンドのデプロイ構成を表すデータモデルを定義します。
//! AWSリソースの記述子そのものは gabstack-aws 側にあり、このクレートは
//! ステージ・固定値・シークレット参照といった入力側のモデルのみを持ちます。

pub mod model;

pub use model::*;
