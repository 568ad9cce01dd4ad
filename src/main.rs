use anyhow::Result;

fn main() -> Result<()> {
    upkeep::cli::run()
}
