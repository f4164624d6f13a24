//! Sequential line-by-line file processing.

use crate::error::{Result, WhitelistError};
use std::future::Future;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::trace;

/// Stream `path` line by line, awaiting `callback` on each non-empty line.
///
/// Lines end at `\n` or `\r\n` and are passed on unchanged otherwise. The
/// next line is not read until the callback for the current one has
/// completed, so at most one callback is ever in flight. The first callback
/// error stops processing and is returned.
pub async fn process_line_by_line<P, F, Fut, T>(path: P, mut callback: F) -> Result<Vec<T>>
where
    P: AsRef<Path>,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .await
        .map_err(|e| WhitelistError::InputFileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut lines = BufReader::new(file).lines();
    let mut outputs = Vec::new();
    let mut line_number = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| WhitelistError::InputFileRead {
            path: path.to_path_buf(),
            source: e,
        })?
    {
        line_number += 1;

        if line.is_empty() {
            continue;
        }

        trace!(line = line_number, "Processing line");
        outputs.push(callback(line).await?);
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn skips_blank_lines_in_order() {
        let file = temp_file("1.1.1.1\n\n2.2.2.2\n");

        let seen = process_line_by_line(file.path(), |line| async move { Ok(line) })
            .await
            .unwrap();

        assert_eq!(seen, vec!["1.1.1.1", "2.2.2.2"]);
    }

    #[tokio::test]
    async fn handles_crlf_line_endings() {
        let file = temp_file("10.0.0.1\r\n\r\n10.0.0.2\r\n10.0.0.3");

        let seen = process_line_by_line(file.path(), |line| async move { Ok(line) })
            .await
            .unwrap();

        assert_eq!(seen, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    }

    #[tokio::test]
    async fn whitespace_lines_are_passed_through_unchanged() {
        let file = temp_file("1.1.1.1\n   \n 2.2.2.2 \n");

        let seen = process_line_by_line(file.path(), |line| async move { Ok(line) })
            .await
            .unwrap();

        assert_eq!(seen, vec!["1.1.1.1", "   ", " 2.2.2.2 "]);
    }

    #[tokio::test]
    async fn callbacks_never_overlap() {
        let file = temp_file("1.1.1.1\n\n2.2.2.2\n");
        let spans: Arc<Mutex<Vec<(String, Instant, Instant)>>> = Arc::default();

        process_line_by_line(file.path(), |line| {
            let spans = Arc::clone(&spans);
            async move {
                let start = Instant::now();
                tokio::time::sleep(Duration::from_millis(20)).await;
                spans.lock().unwrap().push((line, start, Instant::now()));
                Ok(())
            }
        })
        .await
        .unwrap();

        let spans = spans.lock().unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].0, "1.1.1.1");
        assert_eq!(spans[1].0, "2.2.2.2");
        assert!(spans[0].2 <= spans[1].1);
    }

    #[tokio::test]
    async fn failure_stops_remaining_lines() {
        let file = temp_file("a\nb\nc\n");
        let calls: Arc<Mutex<Vec<String>>> = Arc::default();

        let result = process_line_by_line(file.path(), |line| {
            let calls = Arc::clone(&calls);
            async move {
                calls.lock().unwrap().push(line.clone());
                if line == "b" {
                    return Err(WhitelistError::NoZones);
                }
                Ok(())
            }
        })
        .await;

        assert!(matches!(result, Err(WhitelistError::NoZones)));
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn missing_file_fails_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("ip_addresses.txt");

        let result = process_line_by_line(&missing, |_| async { Ok(()) }).await;

        match result {
            Err(WhitelistError::InputFileRead { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
