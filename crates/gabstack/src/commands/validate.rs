use colored::Colorize;
use gabstack_core::{DeployContext, Stage};

pub fn handle(stage: &Stage) -> anyhow::Result<()> {
    println!("{}", "構成を検証中...".blue());

    let ctx = DeployContext::internal();
    let role = gabstack_aws::instance_role(&ctx, stage);
    let sources = gabstack_aws::secret_sources(stage);

    println!("ステージ: {}", stage.to_string().cyan());
    println!();
    println!("サマリー:");
    println!(
        "  サービス名: {}",
        gabstack_aws::apprunner::service_name(&ctx, stage).cyan()
    );
    println!(
        "  イメージ: {}",
        gabstack_aws::apprunner::image_identifier(&ctx, stage)
    );
    println!("  インスタンスロール: {}", role.role_name.cyan());
    println!("  ロール側シークレット: {}", sources.role.name(&ctx));
    println!("  ランタイム側シークレット: {}", sources.service.name(&ctx));
    println!("  イングレス: プライベート（VPCエンドポイント経由のみ）");

    println!();
    if sources.diverges() {
        // develop / prod 以外のステージで起きる、元の構成から引き継いだ非対称
        println!(
            "{}",
            "警告: ロールに許可されたシークレットとランタイムが参照するシークレットが一致しません。"
                .yellow()
        );
        println!(
            "{}",
            "      このステージではサービスが起動時にシークレットを読み取れません。".yellow()
        );
    } else {
        println!("{}", "✓ 構成は正常です！".green().bold());
    }

    Ok(())
}
