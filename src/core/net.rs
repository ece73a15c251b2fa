#[cfg(feature = "test-mode")]
use std::env;

/// Read the response body as text.
/// In `test-mode`, if `LIVEDASH_RECORD=1`, the body is saved as a fixture named after `endpoint`.
pub(crate) async fn get_text(
    resp: reqwest::Response,
    _endpoint: &str,
    _ext: &str,
) -> Result<String, reqwest::Error> {
    let text = resp.text().await?;

    #[cfg(feature = "test-mode")]
    {
        if env::var("LIVEDASH_RECORD").ok().as_deref() == Some("1")
            && let Err(e) = record_fixture(_endpoint, _ext, &text)
        {
            tracing::warn!(endpoint = _endpoint, error = %e, "failed to record fixture");
        }
    }

    Ok(text)
}

#[cfg(feature = "test-mode")]
fn record_fixture(endpoint: &str, ext: &str, body: &str) -> Result<(), std::io::Error> {
    use std::path::{Path, PathBuf};

    let dir = env::var("LIVEDASH_FIXDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"));
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(format!("{endpoint}.{ext}"));
    std::fs::write(&path, body)?;
    tracing::debug!(path = %path.display(), "recorded fixture");
    Ok(())
}
