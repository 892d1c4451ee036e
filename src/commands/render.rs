use mdreplace::build::Builder;
use mdreplace::config::{Config, base_path_from_config};

use crate::RenderArgs;

pub async fn run(args: &RenderArgs) -> Result<(), anyhow::Error> {
    let config_path = Config::path_from_arg(args.config_file.as_deref())?;
    let config = Config::load_from_arg(Some(config_path.as_path())).await?;
    let base_path = base_path_from_config(&config_path);

    let builder = Builder::new(config, base_path);
    let output = builder.render_file(&args.file)?;

    print!("{}", output.html);

    Ok(())
}
