use gabstack_core::Stage;

/// ステージ名を決定する（共通ロジック）
///
/// 優先順位: 位置引数 → -s/--stage フラグ（GAB_STAGE 環境変数を含む）→
/// デフォルトの "develop"。元のSST CLIは --stage 必須だったが、誤って
/// 本番を合成しないよう既定は develop に倒す。
pub fn resolve_stage(positional: Option<String>, flag: Option<String>) -> Stage {
    let label = positional
        .or(flag)
        .unwrap_or_else(|| "develop".to_string());
    Stage::parse(&label)
}
