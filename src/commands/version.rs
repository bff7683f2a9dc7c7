use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("taskmon version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
