// ===========================================================================
// mlctl gpus - Search GPU marketplace offers
// ===========================================================================

use clap::Args;

use crate::cli::Result;
use crate::config::Config;
use crate::process;

const FILTER_FIELDS: &str = "\
Common filter fields:
  disk_space: float    disk storage space, in GB
  gpu_arch: string     host machine gpu architecture (e.g. nvidia, amd)
  gpu_ram: float       per GPU RAM in GB
  num_gpus: int        number of GPUs
  rentable: bool       is the instance currently rentable
  verified: bool       is the machine verified";

#[derive(Args)]
#[command(after_help = FILTER_FIELDS)]
pub struct GpusArgs {
    /// Extra arguments passed to the search tool (e.g. 'num_gpus>=2')
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

pub fn run(args: GpusArgs, config: &Config) -> Result<()> {
    eprintln!("Searching offers with {}...", config.gpu.program);

    let output = process::search_gpu_offers(&config.gpu, &args.args)?;
    print!("{}", output.stdout);
    if !output.stderr.trim().is_empty() {
        eprint!("{}", output.stderr);
    }
    Ok(())
}
