use std::fs;

use clap::Parser;
use memoryfs::create_memory_fs;
use nfsopen::ServerBuilder;
use tracing::Level;

mod memoryfs;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a memory fs YAML file describing the exported tree
    fakefs: Option<String>,
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:11112")]
    bind: String,
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    }

    let fakefs = cli.fakefs.unwrap_or("nfsopen-demo/memoryfs.yaml".to_string());

    println!("Loading YAML: {:?}", fakefs);
    let contents = fs::read_to_string(&fakefs).expect("Should have been able to read the file");
    let root_dir: memoryfs::Directory = serde_yaml::from_str(&contents).unwrap();

    let root = create_memory_fs(root_dir);

    let server = ServerBuilder::new(root).bind(&cli.bind).build();
    server.start();
}
