use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
#[error("Retry failed")]
pub struct RetryFailed;

// Calls `f` once, then up to `attempts` more times while it keeps failing
pub fn retry<T, E, F>(attempts: u32, mut f: F) -> Result<T, RetryFailed>
where
    F: FnMut() -> Result<T, E>,
    E: std::error::Error,
{
    let mut remaining = attempts;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(err) if remaining == 0 => {
                warn!("No more retry attempts. Error: {}", err);
                return Err(RetryFailed);
            }
            Err(err) => {
                warn!(remaining, "Retry triggered. Error: {}", err);
                remaining -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Error, Debug)]
    #[error("flaky")]
    struct Flaky;

    #[test]
    fn test_retry_succeeds_after_failure() {
        let mut calls = 0;
        let result = retry(1, || {
            calls += 1;
            if calls < 2 {
                Err(Flaky)
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn test_retry_gives_up() {
        let mut calls = 0;
        let result: Result<(), RetryFailed> = retry(2, || {
            calls += 1;
            Err(Flaky)
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }
}
