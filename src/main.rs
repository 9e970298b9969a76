#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let code = course_authoring::cli::run().await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
