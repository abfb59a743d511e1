//! モデル定義
//!
//! デプロイ構成の入力側モデル（ステージ、固定値、シークレット参照）。
//! 機能ごとにモジュールへ分離しています。

mod context;
mod secret;
mod stage;

// Re-exports
pub use context::*;
pub use secret::*;
pub use stage::*;
