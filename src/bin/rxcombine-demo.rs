//! Runs the tutorial pipelines and prints what they print.

use clap::{Parser, ValueEnum};
use rxcombine::demos::Demo;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rxcombine-demo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run the rxcombine tutorial pipelines", long_about = None)]
struct Cli {
  /// Demo to run; every demo when omitted.
  #[arg(short, long, value_enum)]
  demo: Option<Demo>,

  /// Button taps simulated by the `assign` demo.
  #[arg(short, long, default_value_t = 2)]
  taps: u32,
}

fn main() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

  let cli = Cli::parse();
  let demos = match cli.demo {
    Some(demo) => vec![demo],
    None => Demo::value_variants().to_vec(),
  };

  for demo in demos {
    if let Some(name) = demo.to_possible_value() {
      println!("== {} ==", name.get_name());
    }
    for line in demo.run(cli.taps) {
      println!("{line}");
    }
  }
}
