use colored::Colorize;
use gabstack_core::{DeployContext, Stage};
use std::path::PathBuf;

pub fn handle(stage: &Stage, output: Option<PathBuf>) -> anyhow::Result<()> {
    let ctx = DeployContext::internal();
    let template = gabstack_aws::synth(&ctx, stage)?;

    match output {
        Some(path) => {
            template.write_to(&path)?;
            eprintln!(
                "{} {}",
                "テンプレートを書き出しました:".green(),
                path.display().to_string().cyan()
            );
        }
        None => {
            // 標準出力はテンプレートJSON専用（パイプしてそのままデプロイに使う）
            println!("{}", template.to_json()?);
        }
    }

    Ok(())
}
