//! Locating, launching and reusing a Chrome instance.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use pagehand_config::{BrowserConfig, ConfigLoader};
use tokio::process::{Child, Command};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::driver::DriverError;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Starts Chrome with remote debugging when nothing answers on the port.
pub struct ChromeLauncher {
    config: BrowserConfig,
    /// Chrome process handle (if we launched it).
    child: Option<Child>,
}

impl ChromeLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            child: None,
        }
    }

    /// HTTP debugging endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.config.debug_port)
    }

    /// Whether this launcher started the running browser.
    pub fn launched(&self) -> bool {
        self.child.is_some()
    }

    /// Find a Chrome, Chromium or Edge executable.
    pub fn find_chrome(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            let expanded = PathBuf::from(ConfigLoader::expand_path(&path.to_string_lossy()));
            return expanded.exists().then_some(expanded);
        }

        let candidates: &[&str] = if cfg!(target_os = "macos") {
            &[
                "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
                "/Applications/Chromium.app/Contents/MacOS/Chromium",
                "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
            ]
        } else if cfg!(target_os = "windows") {
            &[
                r"C:\Program Files\Google\Chrome\Application\chrome.exe",
                r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
                r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
            ]
        } else {
            &[
                "/usr/bin/google-chrome",
                "/usr/bin/google-chrome-stable",
                "/usr/bin/chromium",
                "/usr/bin/chromium-browser",
                "/snap/bin/chromium",
                "/usr/bin/microsoft-edge",
            ]
        };

        candidates.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Check if a browser already answers on the debug port.
    pub async fn is_running(&self) -> bool {
        reqwest::get(format!("{}/json/version", self.endpoint()))
            .await
            .is_ok()
    }

    /// Make sure a browser is reachable, launching one if allowed.
    pub async fn ensure_running(&mut self) -> Result<(), DriverError> {
        if self.is_running().await {
            info!("Browser already running on port {}", self.config.debug_port);
            return Ok(());
        }

        if !self.config.auto_launch {
            return Err(DriverError::BrowserNotAvailable(self.endpoint()));
        }

        info!("Browser not running on port {}, launching...", self.config.debug_port);
        self.child = Some(self.launch()?);

        let deadline = Instant::now() + Duration::from_secs(self.config.launch_timeout_secs);
        while Instant::now() < deadline {
            tokio::time::sleep(READY_POLL_INTERVAL).await;
            if self.is_running().await {
                return Ok(());
            }
        }

        self.shutdown().await;
        Err(DriverError::LaunchFailed(
            "Browser failed to start within timeout".to_string(),
        ))
    }

    fn launch(&self) -> Result<Child, DriverError> {
        let chrome_path = Self::find_chrome(self.config.chrome_path.as_deref()).ok_or_else(|| {
            DriverError::LaunchFailed("No Chrome, Chromium or Edge executable found".to_string())
        })?;
        let profile_dir = PathBuf::from(ConfigLoader::expand_path(
            &self.config.resolved_profile_dir().to_string_lossy(),
        ));

        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching {} with profile at {}", chrome_path.display(), profile_dir.display());

        let mut cmd = Command::new(&chrome_path);
        cmd.args(Self::launch_args(&self.config, &profile_dir))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| DriverError::LaunchFailed(e.to_string()))?;

        info!("Browser launched with PID: {:?}", child.id());
        Ok(child)
    }

    fn launch_args(config: &BrowserConfig, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", config.debug_port),
            format!("--user-data-dir={}", profile_dir.display()),
            format!("--window-size={},{}", config.viewport_width, config.viewport_height),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
            "--metrics-recording-only".to_string(),
        ];
        if config.headless {
            args.push("--headless=new".to_string());
        }
        args
    }

    /// Kill the browser if we launched it.
    pub async fn shutdown(&mut self) {
        if let Some(mut child) = self.child.take() {
            info!("Shutting down launched browser...");
            if let Err(e) = child.kill().await {
                warn!("Failed to kill browser process: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_uses_port() {
        let config = BrowserConfig {
            debug_port: 9333,
            ..Default::default()
        };
        assert_eq!(ChromeLauncher::new(config).endpoint(), "http://127.0.0.1:9333");
    }

    #[test]
    fn test_launch_args() {
        let config = BrowserConfig {
            headless: true,
            ..Default::default()
        };
        let args = ChromeLauncher::launch_args(&config, Path::new("/tmp/profile"));
        assert!(args.contains(&"--remote-debugging-port=9222".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
        assert!(args.contains(&"--window-size=1280,800".to_string()));
        assert!(args.contains(&"--headless=new".to_string()));
    }

    #[test]
    fn test_find_chrome_explicit_missing() {
        assert!(ChromeLauncher::find_chrome(Some(Path::new("/nonexistent/chrome"))).is_none());
    }

    #[test]
    fn test_find_chrome_explicit_existing() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(
            ChromeLauncher::find_chrome(Some(file.path())),
            Some(file.path().to_path_buf())
        );
    }

    #[tokio::test]
    async fn test_no_auto_launch_reports_unavailable() {
        let config = BrowserConfig {
            debug_port: 1,
            auto_launch: false,
            ..Default::default()
        };
        let mut launcher = ChromeLauncher::new(config);
        let result = launcher.ensure_running().await;
        assert!(matches!(result, Err(DriverError::BrowserNotAvailable(_))));
        assert!(!launcher.launched());
    }
}
