use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::AppState;

const DEFAULT_MAX_REQUESTS: u32 = 5;
const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Fixed-window request counter keyed by client. Single-instance only.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    max_requests: u32,
    window: Duration,
}

struct Window {
    count: u32,
    started: Instant,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Ok(remaining) when allowed, Err(retry_after) once the window is used up.
    pub async fn check(&self, key: &str) -> Result<u32, Duration> {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();

        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(entry.started) > self.window {
            entry.count = 0;
            entry.started = now;
        }

        if entry.count >= self.max_requests {
            return Err(self.window.saturating_sub(now.duration_since(entry.started)));
        }

        entry.count += 1;
        Ok(self.max_requests - entry.count)
    }

    /// Drop windows that have been idle for two full periods.
    pub async fn sweep(&self) {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let keep_for = self.window * 2;
        windows.retain(|_, w| now.duration_since(w.started) < keep_for);
    }

    pub async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.len()
    }

    /// Run [`RateLimiter::sweep`] forever on the window period.
    pub fn spawn_sweeper(&self) {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(limiter.window);
            loop {
                interval.tick().await;
                limiter.sweep().await;
            }
        });
    }
}

/// Per-IP, per-path limit for the credential endpoints.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = addr.ip().to_string();
    let path = req.uri().path().to_string();
    let key = format!("{}:{}", ip, path);

    match state.rate_limiter.check(&key).await {
        Ok(remaining) => {
            tracing::debug!(ip = %ip, path = %path, remaining = remaining, "Rate limit check passed");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            tracing::warn!(
                ip = %ip,
                path = %path,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            Err(AppError::RateLimited)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_under_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert_eq!(limiter.check("1.2.3.4:/api/login").await, Ok(2));
        assert_eq!(limiter.check("1.2.3.4:/api/login").await, Ok(1));
        assert_eq!(limiter.check("1.2.3.4:/api/login").await, Ok(0));
    }

    #[tokio::test]
    async fn test_blocks_over_limit() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let _ = limiter.check("k").await;
        let _ = limiter.check("k").await;

        let retry_after = limiter.check("k").await.unwrap_err();
        assert!(retry_after <= Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("login").await.is_ok());
        assert!(limiter.check("login").await.is_err());
        assert!(limiter.check("register").await.is_ok());
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.check("k").await.is_ok());
        assert!(limiter.check("k").await.is_err());
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(limiter.check("k").await.is_ok());
    }

    #[tokio::test]
    async fn test_sweep_drops_idle_windows() {
        let limiter = RateLimiter::new(5, Duration::from_millis(10));
        let _ = limiter.check("idle").await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        let _ = limiter.check("fresh").await;

        limiter.sweep().await;
        assert_eq!(limiter.tracked_keys().await, 1);
    }
}
