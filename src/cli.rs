use clap::{Arg, ArgAction, Command};
use log::debug;
use std::time::Instant;

pub fn build_cli() -> Command {
    debug!("⚙️ Building CLI interface...");
    let start_time = Instant::now();
    let cmd = Command::new("camsnap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Preview a webcam and save still photos with a single key.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom configuration file")
                .global(true)
                .action(ArgAction::Set)
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Enable debug logging")
                .global(true)
                .action(ArgAction::SetTrue)
        )
        .arg(Arg::new("output").short('o').long("output").value_name("DIR").help("Output directory for photos").global(true).action(ArgAction::Set))
        .arg(Arg::new("camera").long("camera").value_name("INDEX").help("Camera index to open (0, 1, ...)").value_parser(clap::value_parser!(i32).range(0..)).global(true).action(ArgAction::Set))
        .arg(Arg::new("lang").long("lang").value_name("LANG").help("Interface language").value_parser(["en", "zh"]).global(true).action(ArgAction::Set))
        .subcommand(
            Command::new("preview")
                .about("Opens the preview window (default when no subcommand is given)")
        )
        .subcommand(
            Command::new("snap")
                .about("Captures a single photo without opening a window")
                .arg(Arg::new("frames").long("frames").value_name("N").help("Frames to pump before saving (default: 30)").value_parser(clap::value_parser!(u32).range(1..)).action(ArgAction::Set))
        )
        .subcommand(
            Command::new("probe")
                .about("Reports which camera indices can be opened")
                .arg(Arg::new("max-index").long("max-index").value_name("N").help("Highest index to try (default: 5)").value_parser(clap::value_parser!(i32).range(0..64)).action(ArgAction::Set))
        );
    debug!("✅ CLI interface built in {:?}", start_time.elapsed());
    cmd
}
