#[tokio::main]
async fn main() {
    if let Err(e) = community_health::run().await {
        eprintln!("community-health: {e}");
        std::process::exit(1);
    }
}
