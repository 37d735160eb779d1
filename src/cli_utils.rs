use anyhow::Result;

/// Reads one line from stdin, `None` once stdin is closed.
pub fn readline() -> Result<Option<String>> {
    let mut buffer = String::new();
    let read = std::io::stdin().read_line(&mut buffer)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(buffer))
}
