//! Default command: run the extraction pipeline on one image.

use clap::Args;
use scribe_core::{to_pretty_json, Config, Scribe, Settings};

/// Image used when no path is given.
pub const DEFAULT_IMAGE: &str = "images/sample.webp";

/// Arguments for extraction.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Image file to extract from
    #[arg(value_name = "IMAGE", default_value = DEFAULT_IMAGE)]
    pub image: String,
}

/// Run the pipeline and print the result on stdout.
pub async fn execute(args: ExtractArgs, config: Config) -> anyhow::Result<()> {
    let scribe = Scribe::new(config, Settings::from_env());
    let result = scribe.run_pipeline(&args.image).await?;
    println!("{}", to_pretty_json(&result)?);
    Ok(())
}
