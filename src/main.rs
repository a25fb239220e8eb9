use anyhow::Result;
use clap::{crate_version, App as Cli, Arg};
use issue_dash::{App, Config, Link};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Cli::new("issue-dash")
        .version(crate_version!())
        .about("Search, filter, sort and group issues in the terminal")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Use a custom configuration directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("link")
                .short("l")
                .long("link")
                .value_name("QUERY")
                .help("Open a shared link, e.g. '?issueId=ENG-42'")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("reset")
                .long("reset")
                .help("Forget persisted view state"),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    let link = matches.value_of("link").map(Link::parse).unwrap_or_default();
    App::start(config, link, matches.is_present("reset")).await
}
