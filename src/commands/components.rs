use mdreplace::build::Builder;
use mdreplace::config::{Config, base_path_from_config};

use crate::ComponentsArgs;

pub async fn run(args: &ComponentsArgs) -> Result<(), anyhow::Error> {
    let config_path = Config::path_from_arg(args.config_file.as_deref())?;
    let config = Config::load_from_arg(Some(config_path.as_path())).await?;
    let base_path = base_path_from_config(&config_path);

    let builder = Builder::new(config, base_path);
    let (overrides, entries) = builder.overrides()?;

    if overrides.is_empty() {
        println!("No overrides configured; every node uses the default rendering");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{:<8} {:<12} {}",
            entry.kind.to_string(),
            entry.kind.capability().to_string(),
            entry.component
        );
    }
    println!("{} override(s)", overrides.len());

    Ok(())
}
