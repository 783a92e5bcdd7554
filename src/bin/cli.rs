use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    patients_care::cli::run().await
}
