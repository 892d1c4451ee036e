use mdreplace::build::Builder;
use mdreplace::config::{Config, base_path_from_config};

use crate::BuildArgs;

pub async fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    let config_path = Config::path_from_arg(args.config_file.as_deref())?;
    let config = Config::load_from_arg(Some(config_path.as_path())).await?;

    // Get the base path for resolving relative paths
    let base_path = base_path_from_config(&config_path);

    let builder = Builder::new(config, base_path);
    let result = builder.build().await?;

    println!(
        "Built site to {} ({} documents, {} drafts skipped, {} static files, {} overrides)",
        result.output_dir.display(),
        result.documents,
        result.drafts,
        result.static_files,
        result.overrides
    );

    Ok(())
}
