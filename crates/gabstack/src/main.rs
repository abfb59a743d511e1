mod commands;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gab")]
#[command(about = "sample-gab-be のAWSインフラを宣言・合成する", long_about = None)]
struct Cli {
    /// DEBUGレベルのログを出力
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// スタックテンプレートを合成
    Synth {
        /// ステージ名 (develop, prod)
        stage: Option<String>,
        /// ステージ名 (-s/--stage フラグ、GAB_STAGE 環境変数)
        #[arg(
            short = 's',
            long = "stage",
            env = "GAB_STAGE",
            conflicts_with = "stage",
            hide = true
        )]
        stage_flag: Option<String>,
        /// 出力先ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 合成される構成を検証・表示
    Validate {
        /// ステージ名 (develop, prod)
        stage: Option<String>,
        /// ステージ名 (-s/--stage フラグ、GAB_STAGE 環境変数)
        #[arg(
            short = 's',
            long = "stage",
            env = "GAB_STAGE",
            conflicts_with = "stage",
            hide = true
        )]
        stage_flag: Option<String>,
    },
    /// バージョンを表示
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // synth は標準出力をテンプレートJSONに使うので、ログはstderrへ
    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Version => {
            println!("gabstack {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Synth {
            stage,
            stage_flag,
            output,
        } => {
            let stage = utils::resolve_stage(stage, stage_flag);
            commands::synth::handle(&stage, output)
        }
        Commands::Validate { stage, stage_flag } => {
            let stage = utils::resolve_stage(stage, stage_flag);
            commands::validate::handle(&stage)
        }
    }
}
