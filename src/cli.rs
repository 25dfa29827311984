use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Convert proxy share links to sing-box config files", long_about = None)]
pub struct Args {
    #[arg(help = "Share-link list, subscription URL, sing-box JSON file, or '-' for stdin")]
    pub input: String,

    #[arg(short, long, help = "Write output to a file instead of stdout")]
    pub output: Option<String>,

    #[arg(long, help = "Add region and ad/malware block rule sets to the generated config")]
    pub enhanced: bool,

    #[arg(long, help = "Generate deterministic outbound tags with this prefix")]
    pub tag_prefix: Option<String>,

    #[arg(short, long, help = "Emit debug log")]
    pub verbose: bool,
}
