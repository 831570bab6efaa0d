// ===========================================================================
// mlctl config - Show or create the config file
// ===========================================================================

use crate::cli::Result;
use crate::config::Config;

pub fn run(config: &Config) -> Result<()> {
    let path = config.base_dir.join("config.toml");

    if path.exists() {
        eprintln!("Config: {}", path.display());
    } else {
        let path = config.save()?;
        eprintln!("Created {}", path.display());
    }

    eprintln!("Token file: {}", config.auth.token_file.display());
    eprintln!("Credentials file: {}", config.auth.credentials_file.display());
    eprintln!("Upload chunk size: {} MiB", config.upload.chunk_size_mib);
    eprintln!("GPU search: {} {}", config.gpu.program, config.gpu.args.join(" "));
    Ok(())
}
