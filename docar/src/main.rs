#![allow(dangerous_implicit_autorefs)]
use clap::{
    crate_authors, crate_description, crate_name, crate_version, App, AppSettings, Arg, SubCommand,
};
use docar::{expand, pack, Container};

fn main() -> anyhow::Result<()> {
    let arg_archive = Arg::with_name("archive")
        .help("Archive file")
        .short("a")
        .long("archive")
        .required(true)
        .takes_value(true)
        .value_name("FILE");

    let arg_dir = Arg::with_name("dir")
        .help("Directory to pack from / expand into (defaults to '.')")
        .required(true)
        .value_name("DIR")
        .default_value(".");

    let arg_verbose = Arg::with_name("verbose")
        .help("Increase log verbosity")
        .short("v")
        .long("verbose")
        .multiple(true);

    let matches = App::new(crate_name!())
        .author(crate_authors!(", "))
        .about(crate_description!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(&arg_verbose)
        .subcommand(
            SubCommand::with_name("create")
                .about("Pack a directory tree into a compound archive")
                .arg(&arg_archive)
                .arg(&arg_dir),
        )
        .subcommand(
            SubCommand::with_name("extract")
                .about("Expand a compound archive into a directory tree")
                .arg(&arg_archive)
                .arg(&arg_dir),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("List the streams packed in a compound archive")
                .arg(&arg_archive),
        )
        .get_matches();

    init_tracing(matches.occurrences_of("verbose"));

    if let Some(matches) = matches.subcommand_matches("create") {
        pack(
            matches.value_of("dir").unwrap(),
            None,
            matches.value_of("archive").unwrap(),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("extract") {
        expand(
            matches.value_of("archive").unwrap(),
            matches.value_of("dir").unwrap(),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("list") {
        let container = Container::open(matches.value_of("archive").unwrap())?;
        for entry in container.entries() {
            println!("{}", entry.path);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u64) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(format!("docar={level},docar_core={level}"))
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
