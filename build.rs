use anyhow::Result;
use vergen::EmitBuilder;

// Git metadata ends up in `sapos-query --version`
fn main() -> Result<()> {
    EmitBuilder::builder()
        .git_sha(true)
        .git_commit_date()
        .emit()?;
    Ok(())
}
