#[macro_use]
extern crate tracing;

use std::io;

use dotenvy::dotenv;

mod abuseipdb;
mod app;
mod config;
mod error;
mod input;
mod prompt;
mod report;
mod trace;

pub use config::CONFIG;
pub use error::Error;

use app::App;
use prompt::Prompt;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    launch_info();
    dotenv().ok();
    trace::init();
    debug!("{:?}", CONFIG.api);

    let prompt = Prompt::new(io::stdin().lock(), io::stdout());
    let outcome = App::new(prompt, &CONFIG.api).run().await;
    debug!("run finished: {:?}", outcome);
}

fn launch_info() {
    println!();
    println!(
        "=================== AbuseIPDB Report {} ===================",
        env!("CARGO_PKG_VERSION")
    );
    println!();
}
