use webcrawler::commands::command_argument_builder;
use webcrawler::handlers::handle_crawl;

#[tokio::main]
async fn main() {
    let mut cmd = command_argument_builder();
    let usage = cmd.render_usage().to_string();
    let matches = cmd.get_matches();

    handle_crawl(&matches, &usage).await;
}
