use crate::CLAP_STYLING;
use clap::arg;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("webcrawler")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("webcrawler")
        .about("Crawls a site from a seed URL and prints a JSON site map of its pages")
        .styles(CLAP_STYLING)
        .arg(
            arg!(<URL>)
                .required(true)
                .help("The absolute http(s) URL to start crawling from"),
        )
        .arg(
            arg!(-c --"concurrency" <NUM_WORKERS>)
                .required(false)
                .help("Number of pages fetched concurrently")
                .value_parser(clap::builder::RangedU64ValueParser::<usize>::new().range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(-d --"debug")
                .required(false)
                .help("Enable debug logging on stderr")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"no-indent")
                .required(false)
                .help("Print the site map without indentation")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("30"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Write the site map to a file instead of stdout"),
        )
        .arg(
            arg!(-q --"quiet" "Suppress the progress spinner and summary").required(false),
        )
}
