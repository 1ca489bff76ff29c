#[tokio::main]
async fn main() {
    if let Err(e) = cpss_lib::run().await {
        eprintln!("cpss: {e}");
        std::process::exit(1);
    }
}
