#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    after_school_api::run().await
}
