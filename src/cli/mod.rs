use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "weightly")]
#[command(version, about = "A manifest-driven fetcher for model weight files", long_about = None)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Download one or more weights into the local cache
	Fetch {
		/// Weight identifiers as listed in the manifest (e.g., "lora/styleA.safetensors")
		#[arg(required = true)]
		weights: Vec<String>,
	},

	/// List weights available in the manifest
	List {
		/// Only show weights of the given type (e.g., "checkpoints" or "loras")
		#[arg(long = "type")]
		weight_type: Option<String>,

		/// Emit the listing as JSON
		#[arg(long)]
		json: bool,
	},
}
